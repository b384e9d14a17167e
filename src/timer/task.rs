//! Work item emitted by the periodic producer

use std::fmt;
use std::time::{Duration, Instant};

/// One unit of work: a 0-based sequence number stamped at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Task {
    pub sequence: u64,
    pub created_at: Instant,
}

impl Task {
    pub fn new(sequence: u64) -> Self {
        Self {
            sequence,
            created_at: Instant::now(),
        }
    }

    /// Time since the producer created this task
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task #{}", self.sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_uses_sequence() {
        assert_eq!(Task::new(7).to_string(), "task #7");
    }

    #[test]
    fn test_age_grows() {
        let task = Task::new(0);
        std::thread::sleep(Duration::from_millis(5));
        assert!(task.age() >= Duration::from_millis(5));
    }
}
