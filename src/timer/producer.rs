//! Periodic producer
//!
//! Emits a fixed number of items at a fixed period, then closes the queue.

use crate::queue::api::{BoundedQueue, QueueError, QueueResult, TryEnqueueError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Outcome of a producer run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProducerReport {
    /// Successful enqueues
    pub produced: u64,
    /// The queue was closed before every iteration ran
    pub interrupted: bool,
}

pub struct Producer<T> {
    queue: Arc<BoundedQueue<T>>,
    tasks: u64,
    period: Duration,
    drift_correction: bool,
}

impl<T> Producer<T> {
    pub fn new(queue: Arc<BoundedQueue<T>>, tasks: u64, period: Duration) -> Self {
        Self {
            queue,
            tasks,
            period,
            drift_correction: false,
        }
    }

    /// Shorten each sleep by the time the previous enqueue spent blocked
    pub fn drift_correction(mut self, enabled: bool) -> Self {
        self.drift_correction = enabled;
        self
    }

    /// Run every iteration, then close the queue
    ///
    /// The queue is closed on every exit path, including errors, so consumers
    /// never wait on a producer that has gone away. Being closed early by
    /// someone else is not an error; the report is marked `interrupted`.
    pub fn run<F>(self, make_item: F) -> QueueResult<ProducerReport>
    where
        F: FnMut(u64) -> T,
    {
        let result = self.produce(make_item);
        self.queue.close();
        if let Ok(report) = &result {
            log::debug!(
                "producer: finished, {} of {} items queued{}",
                report.produced,
                self.tasks,
                if report.interrupted { " (interrupted)" } else { "" }
            );
        }
        result
    }

    fn produce<F>(&self, mut make_item: F) -> QueueResult<ProducerReport>
    where
        F: FnMut(u64) -> T,
    {
        let mut report = ProducerReport {
            produced: 0,
            interrupted: false,
        };
        let mut last_enqueue = Duration::ZERO;

        for sequence in 0..self.tasks {
            let pause = if self.drift_correction {
                self.period.saturating_sub(last_enqueue)
            } else {
                self.period
            };
            if !pause.is_zero() {
                thread::sleep(pause);
            }

            let started = Instant::now();
            let outcome = self.enqueue(make_item(sequence));
            last_enqueue = started.elapsed();

            match outcome {
                Ok(()) => {
                    report.produced += 1;
                    log::trace!("producer: queued item {}", sequence);
                }
                Err(QueueError::Closed) => {
                    log::info!(
                        "producer: queue closed after {} of {} items",
                        report.produced,
                        self.tasks
                    );
                    report.interrupted = true;
                    break;
                }
                Err(error) => return Err(error),
            }
        }

        Ok(report)
    }

    /// Non-blocking attempt first so a full buffer gets reported before waiting
    fn enqueue(&self, item: T) -> QueueResult<()> {
        match self.queue.try_enqueue(item) {
            Ok(()) => Ok(()),
            Err(TryEnqueueError::Full(item)) => {
                log::debug!("producer: queue FULL");
                self.queue.enqueue(item)
            }
            Err(TryEnqueueError::Closed(_)) => Err(QueueError::Closed),
            Err(TryEnqueueError::Timeout(_)) => Err(QueueError::Timeout),
            Err(TryEnqueueError::Poisoned(_)) => Err(QueueError::Poisoned {
                message: "lock poisoned during enqueue".to_string(),
            }),
        }
    }
}
