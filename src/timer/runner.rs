//! Pipeline lifecycle driver
//!
//! Owns the queue, starts one producer and a consumer pool, and enforces the
//! shutdown order: join producer, close, join consumers. The queue is only
//! released after every thread has been joined.

use crate::core::validation::{require_positive, ValidationError};
use crate::queue::api::{BoundedQueue, QueueStats};
use crate::timer::consumer::ConsumerPool;
use crate::timer::error::{PipelineError, PipelineResult};
use crate::timer::producer::Producer;
use crate::timer::task::Task;
use serde::Serialize;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

pub const DEFAULT_CAPACITY: usize = 10;
pub const DEFAULT_TASKS: u64 = 20;
pub const DEFAULT_CONSUMERS: usize = 10;
pub const DEFAULT_PERIOD: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub capacity: usize,
    /// Producer iterations
    pub tasks: u64,
    pub consumers: usize,
    pub period: Duration,
    pub drift_correction: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            tasks: DEFAULT_TASKS,
            consumers: DEFAULT_CONSUMERS,
            period: DEFAULT_PERIOD,
            drift_correction: false,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_positive("--capacity", self.capacity as u64)?;
        require_positive("--tasks", self.tasks)?;
        require_positive("--consumers", self.consumers as u64)?;
        Ok(())
    }
}

/// Summary of a completed run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub produced: u64,
    pub consumed: u64,
    /// Items handled by each consumer, indexed by worker number
    pub per_consumer: Vec<u64>,
    /// The queue was closed before the producer finished
    pub interrupted: bool,
    pub elapsed: Duration,
    pub stats: QueueStats,
}

/// One producer, a pool of consumers, and the queue between them
///
/// A pipeline runs once; `run` consumes it.
pub struct Pipeline {
    config: PipelineConfig,
    queue: Arc<BoundedQueue<Task>>,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> PipelineResult<Self> {
        config.validate()?;
        let queue = Arc::new(BoundedQueue::new(config.capacity)?);
        Ok(Self { config, queue })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Shared handle to the queue; calling `close()` on it stops the run early
    pub fn queue(&self) -> Arc<BoundedQueue<Task>> {
        Arc::clone(&self.queue)
    }

    /// Run to completion, discarding items after they are dequeued
    pub fn run(self) -> PipelineResult<RunReport> {
        self.run_with(|_, _| {})
    }

    /// Run to completion, handing every dequeued task to `handler`
    pub fn run_with<H>(self, handler: H) -> PipelineResult<RunReport>
    where
        H: Fn(usize, Task) + Send + Sync + 'static,
    {
        let started = Instant::now();
        log::debug!(
            "pipeline: capacity={} tasks={} consumers={} period={:?} drift_correction={}",
            self.config.capacity,
            self.config.tasks,
            self.config.consumers,
            self.config.period,
            self.config.drift_correction
        );

        let producer = Producer::new(Arc::clone(&self.queue), self.config.tasks, self.config.period)
            .drift_correction(self.config.drift_correction);
        let producer = thread::Builder::new()
            .name("producer".to_string())
            .spawn(move || producer.run(Task::new))
            .map_err(|source| PipelineError::Spawn {
                role: "producer".to_string(),
                source,
            })?;

        let consumers = match ConsumerPool::spawn(&self.queue, self.config.consumers, handler) {
            Ok(pool) => pool,
            Err(error) => {
                // The pool already closed the queue, so the producer stops
                let _ = producer.join();
                return Err(error);
            }
        };

        let produced = producer.join();
        // Idempotent; also covers a producer that panicked before closing
        self.queue.close();
        let per_consumer = consumers.join();

        let report = match produced {
            Ok(report) => report?,
            Err(_) => {
                return Err(PipelineError::WorkerPanicked {
                    role: "producer".to_string(),
                })
            }
        };
        let per_consumer = per_consumer?;
        let consumed = per_consumer.iter().sum();

        Ok(RunReport {
            produced: report.produced,
            consumed,
            per_consumer,
            interrupted: report.interrupted,
            elapsed: started.elapsed(),
            stats: self.queue.stats(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_demo_constants() {
        let config = PipelineConfig::default();
        assert_eq!(config.capacity, 10);
        assert_eq!(config.tasks, 20);
        assert_eq!(config.consumers, 10);
        assert_eq!(config.period, Duration::from_millis(100));
        assert!(!config.drift_correction);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_values_rejected() {
        for config in [
            PipelineConfig {
                capacity: 0,
                ..PipelineConfig::default()
            },
            PipelineConfig {
                tasks: 0,
                ..PipelineConfig::default()
            },
            PipelineConfig {
                consumers: 0,
                ..PipelineConfig::default()
            },
        ] {
            assert!(matches!(
                Pipeline::new(config),
                Err(PipelineError::Config(_))
            ));
        }
    }

    #[test]
    fn test_run_consumes_every_task() {
        let pipeline = Pipeline::new(PipelineConfig {
            capacity: 3,
            tasks: 40,
            consumers: 4,
            period: Duration::ZERO,
            drift_correction: false,
        })
        .unwrap();

        let report = pipeline.run().unwrap();

        assert_eq!(report.produced, 40);
        assert_eq!(report.consumed, 40);
        assert_eq!(report.per_consumer.len(), 4);
        assert!(!report.interrupted);
        assert!(report.stats.closed);
        assert_eq!(report.stats.total_dequeued, 40);
        assert!(report.stats.high_water_mark <= 3);
    }

    #[test]
    fn test_early_close_interrupts_producer() {
        let pipeline = Pipeline::new(PipelineConfig {
            capacity: 2,
            tasks: 1_000,
            consumers: 2,
            period: Duration::from_millis(5),
            drift_correction: true,
        })
        .unwrap();
        let queue = pipeline.queue();

        let closer = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            queue.close();
        });
        let report = pipeline.run().unwrap();
        closer.join().unwrap();

        assert!(report.interrupted);
        assert!(report.produced < 1_000);
        // Everything accepted before the close was still delivered
        assert_eq!(report.consumed, report.produced);
    }
}
