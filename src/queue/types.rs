//! Type definitions for the queue system

use serde::Serialize;

/// Point-in-time view of a queue, taken under its lock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QueueStats {
    /// Fixed number of slots
    pub capacity: usize,
    /// Occupied slots at the time of the snapshot
    pub len: usize,
    /// Whether `close()` has been called
    pub closed: bool,
    /// Successful enqueues since creation
    pub total_enqueued: u64,
    /// Successful dequeues since creation
    pub total_dequeued: u64,
    /// Largest `len` ever observed
    pub high_water_mark: usize,
}

impl QueueStats {
    /// Items accepted but not yet handed to a consumer
    pub fn in_flight(&self) -> u64 {
        self.total_enqueued - self.total_dequeued
    }

    /// Fraction of slots occupied, in `0.0..=1.0`
    pub fn utilisation(&self) -> f64 {
        self.len as f64 / self.capacity as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_values() {
        let stats = QueueStats {
            capacity: 4,
            len: 1,
            closed: false,
            total_enqueued: 9,
            total_dequeued: 8,
            high_water_mark: 4,
        };
        assert_eq!(stats.in_flight(), 1);
        assert!((stats.utilisation() - 0.25).abs() < f64::EPSILON);
    }
}
