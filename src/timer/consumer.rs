//! Consumer worker pool
//!
//! Each worker is a named OS thread that dequeues until the queue reports
//! `Closed`, handing every item to a shared handler.

use crate::queue::api::{BoundedQueue, QueueError, QueueResult};
use crate::timer::error::{PipelineError, PipelineResult};
use std::fmt;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Handle to a running set of consumer threads
pub struct ConsumerPool {
    workers: Vec<JoinHandle<QueueResult<u64>>>,
}

impl ConsumerPool {
    /// Start `workers` consumer threads against `queue`
    ///
    /// `handler` receives the worker index and the item. If a thread cannot be
    /// spawned the queue is closed, the already running workers are joined and
    /// the spawn error is returned.
    pub fn spawn<T, H>(
        queue: &Arc<BoundedQueue<T>>,
        workers: usize,
        handler: H,
    ) -> PipelineResult<Self>
    where
        T: fmt::Display + Send + 'static,
        H: Fn(usize, T) + Send + Sync + 'static,
    {
        let handler = Arc::new(handler);
        let mut pool = Self {
            workers: Vec::with_capacity(workers),
        };

        for index in 0..workers {
            let queue = Arc::clone(queue);
            let handler = Arc::clone(&handler);
            let role = format!("consumer-{}", index);
            let worker_queue = Arc::clone(&queue);

            let spawned = thread::Builder::new()
                .name(role.clone())
                .spawn(move || consume(index, &worker_queue, handler.as_ref()));

            match spawned {
                Ok(handle) => pool.workers.push(handle),
                Err(source) => {
                    queue.close();
                    let _ = pool.join();
                    return Err(PipelineError::Spawn { role, source });
                }
            }
        }

        Ok(pool)
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// Wait for every worker and return how many items each processed
    ///
    /// All workers are joined even if one fails; the first failure is returned.
    pub fn join(self) -> PipelineResult<Vec<u64>> {
        let mut processed = Vec::with_capacity(self.workers.len());
        let mut first_error = None;

        for (index, worker) in self.workers.into_iter().enumerate() {
            let outcome = match worker.join() {
                Ok(Ok(count)) => Ok(count),
                Ok(Err(error)) => Err(PipelineError::Queue(error)),
                Err(_) => Err(PipelineError::WorkerPanicked {
                    role: format!("consumer-{}", index),
                }),
            };
            match outcome {
                Ok(count) => processed.push(count),
                Err(error) => {
                    log::warn!("consumer-{}: {}", index, error);
                    processed.push(0);
                    first_error.get_or_insert(error);
                }
            }
        }

        match first_error {
            Some(error) => Err(error),
            None => Ok(processed),
        }
    }
}

/// Worker loop: returns the number of items handled once the queue is drained
fn consume<T, H>(worker: usize, queue: &BoundedQueue<T>, handler: &H) -> QueueResult<u64>
where
    T: fmt::Display,
    H: Fn(usize, T) + ?Sized,
{
    let mut processed = 0;

    loop {
        let next = match queue.try_dequeue() {
            Ok(Some(item)) => Ok(item),
            Ok(None) => {
                log::trace!("consumer-{}: queue EMPTY", worker);
                queue.dequeue()
            }
            Err(error) => Err(error),
        };

        match next {
            Ok(item) => {
                log::debug!("consumer-{}: received {}", worker, item);
                handler(worker, item);
                processed += 1;
            }
            Err(QueueError::Closed) => break,
            Err(error) => return Err(error),
        }
    }

    log::debug!("consumer-{}: exiting after {} items", worker, processed);
    Ok(processed)
}
