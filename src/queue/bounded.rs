//! BoundedQueue implementation
//!
//! A monitor around a fixed-capacity ring buffer: one mutex guards the
//! buffer, the closed flag and the counters; two condition variables
//! ("not full", "not empty") let producers and consumers sleep without
//! holding the lock. Normal operations wake a single waiter, `close()`
//! wakes every waiter.

use crate::core::sync::{handle_mutex_poison, recover_poison};
use crate::queue::error::{QueueError, QueueResult, TryEnqueueError};
use crate::queue::ring::RingBuffer;
use crate::queue::types::QueueStats;
use std::fmt;
use std::sync::{Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Everything the lock protects
struct QueueState<T> {
    ring: RingBuffer<T>,
    /// Monotonic: false -> true, never reset
    closed: bool,
    total_enqueued: u64,
    total_dequeued: u64,
    high_water_mark: usize,
}

impl<T> QueueState<T> {
    /// Hands the item back when the ring is full
    fn put(&mut self, item: T) -> Result<(), T> {
        self.ring.push(item)?;
        self.total_enqueued += 1;
        self.high_water_mark = self.high_water_mark.max(self.ring.len());
        Ok(())
    }

    fn take(&mut self) -> Option<T> {
        let item = self.ring.pop()?;
        self.total_dequeued += 1;
        Some(item)
    }

    fn stats(&self) -> QueueStats {
        QueueStats {
            capacity: self.ring.capacity(),
            len: self.ring.len(),
            closed: self.closed,
            total_enqueued: self.total_enqueued,
            total_dequeued: self.total_dequeued,
            high_water_mark: self.high_water_mark,
        }
    }
}

/// Fixed-capacity, thread-safe FIFO queue with blocking enqueue/dequeue
///
/// Share it between threads with `Arc<BoundedQueue<T>>`. Items come out in
/// exactly the order they went in, regardless of how many producers or
/// consumers race; which consumer receives a given item is unspecified.
///
/// # Shutdown
///
/// [`close`](Self::close) is the only cancellation signal. After it:
/// - `enqueue` fails immediately with [`QueueError::Closed`], including
///   producers that were blocked on a full buffer;
/// - `dequeue` keeps draining buffered items and only returns
///   [`QueueError::Closed`] once the buffer is empty.
///
/// # Example
///
/// ```
/// use pcqueue::queue::{BoundedQueue, QueueError};
/// use std::sync::Arc;
/// use std::thread;
///
/// let queue = Arc::new(BoundedQueue::new(2).unwrap());
///
/// let worker = {
///     let queue = Arc::clone(&queue);
///     thread::spawn(move || {
///         let mut received = Vec::new();
///         while let Ok(item) = queue.dequeue() {
///             received.push(item);
///         }
///         received
///     })
/// };
///
/// for i in 0..5 {
///     queue.enqueue(i).unwrap();
/// }
/// queue.close();
///
/// assert_eq!(worker.join().unwrap(), vec![0, 1, 2, 3, 4]);
/// assert_eq!(queue.enqueue(5), Err(QueueError::Closed));
/// ```
pub struct BoundedQueue<T> {
    state: Mutex<QueueState<T>>,
    not_full: Condvar,
    not_empty: Condvar,
}

fn poisoned(message: String) -> QueueError {
    QueueError::Poisoned { message }
}

impl<T> BoundedQueue<T> {
    /// Create a queue with `capacity` slots
    ///
    /// Fails with [`QueueError::InvalidCapacity`] when `capacity` is zero.
    pub fn new(capacity: usize) -> QueueResult<Self> {
        if capacity == 0 {
            return Err(QueueError::InvalidCapacity);
        }
        Ok(Self {
            state: Mutex::new(QueueState {
                ring: RingBuffer::new(capacity),
                closed: false,
                total_enqueued: 0,
                total_dequeued: 0,
                high_water_mark: 0,
            }),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
        })
    }

    fn lock(&self) -> QueueResult<MutexGuard<'_, QueueState<T>>> {
        handle_mutex_poison(self.state.lock(), poisoned)
    }

    fn observe(&self) -> MutexGuard<'_, QueueState<T>> {
        recover_poison(self.state.lock())
    }

    /// Append an item, blocking while the queue is full
    ///
    /// Returns [`QueueError::Closed`] if the queue is closed on entry or
    /// while waiting for space.
    pub fn enqueue(&self, mut item: T) -> QueueResult<()> {
        let mut state = self.lock()?;
        // Predicate re-checked after every wake, spurious or not
        loop {
            if state.closed {
                return Err(QueueError::Closed);
            }
            match state.put(item) {
                Ok(()) => {
                    drop(state);
                    self.not_empty.notify_one();
                    return Ok(());
                }
                Err(rejected) => {
                    item = rejected;
                    state = handle_mutex_poison(self.not_full.wait(state), poisoned)?;
                }
            }
        }
    }

    /// Remove the oldest item, blocking while the queue is empty and open
    ///
    /// Returns [`QueueError::Closed`] only when the queue is closed *and*
    /// fully drained.
    pub fn dequeue(&self) -> QueueResult<T> {
        let mut state = self.lock()?;
        // Predicate re-checked after every wake, spurious or not
        loop {
            if let Some(item) = state.take() {
                drop(state);
                self.not_full.notify_one();
                return Ok(item);
            }
            if state.closed {
                return Err(QueueError::Closed);
            }
            state = handle_mutex_poison(self.not_empty.wait(state), poisoned)?;
        }
    }

    /// Append without blocking; the item is handed back on failure
    pub fn try_enqueue(&self, item: T) -> Result<(), TryEnqueueError<T>> {
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(_) => return Err(TryEnqueueError::Poisoned(item)),
        };
        if state.closed {
            return Err(TryEnqueueError::Closed(item));
        }
        state.put(item).map_err(TryEnqueueError::Full)?;
        drop(state);
        self.not_empty.notify_one();
        Ok(())
    }

    /// Remove without blocking
    ///
    /// `Ok(None)` means empty but still open; `Err(Closed)` means empty and
    /// closed, so nothing will ever arrive.
    pub fn try_dequeue(&self) -> QueueResult<Option<T>> {
        let mut state = self.lock()?;
        match state.take() {
            Some(item) => {
                drop(state);
                self.not_full.notify_one();
                Ok(Some(item))
            }
            None if state.closed => Err(QueueError::Closed),
            None => Ok(None),
        }
    }

    /// Like [`enqueue`](Self::enqueue) but gives up after `timeout`
    pub fn enqueue_timeout(&self, mut item: T, timeout: Duration) -> Result<(), TryEnqueueError<T>> {
        let deadline = Instant::now().checked_add(timeout);
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(_) => return Err(TryEnqueueError::Poisoned(item)),
        };
        loop {
            if state.closed {
                return Err(TryEnqueueError::Closed(item));
            }
            item = match state.put(item) {
                Ok(()) => {
                    drop(state);
                    self.not_empty.notify_one();
                    return Ok(());
                }
                Err(rejected) => rejected,
            };
            let waited = match deadline {
                Some(deadline) => {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    if remaining.is_zero() {
                        return Err(TryEnqueueError::Timeout(item));
                    }
                    self.not_full
                        .wait_timeout(state, remaining)
                        .ok()
                        .map(|(state, _)| state)
                }
                None => self.not_full.wait(state).ok(),
            };
            state = match waited {
                Some(state) => state,
                None => return Err(TryEnqueueError::Poisoned(item)),
            };
        }
    }

    /// Like [`dequeue`](Self::dequeue) but gives up with
    /// [`QueueError::Timeout`] after `timeout`
    pub fn dequeue_timeout(&self, timeout: Duration) -> QueueResult<T> {
        let deadline = Instant::now().checked_add(timeout);
        let mut state = self.lock()?;
        loop {
            if let Some(item) = state.take() {
                drop(state);
                self.not_full.notify_one();
                return Ok(item);
            }
            if state.closed {
                return Err(QueueError::Closed);
            }
            state = match deadline {
                Some(deadline) => {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    if remaining.is_zero() {
                        return Err(QueueError::Timeout);
                    }
                    handle_mutex_poison(self.not_empty.wait_timeout(state, remaining), poisoned)?.0
                }
                None => handle_mutex_poison(self.not_empty.wait(state), poisoned)?,
            };
        }
    }

    /// Mark the queue closed and wake every waiter
    ///
    /// Idempotent: only the first call changes state or wakes anyone.
    pub fn close(&self) {
        let mut state = self.observe();
        if state.closed {
            return;
        }
        state.closed = true;
        drop(state);
        self.not_empty.notify_all();
        self.not_full.notify_all();
    }

    pub fn capacity(&self) -> usize {
        self.observe().ring.capacity()
    }

    pub fn len(&self) -> usize {
        self.observe().ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observe().ring.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.observe().ring.is_full()
    }

    pub fn is_closed(&self) -> bool {
        self.observe().closed
    }

    /// Consistent snapshot of size, state and counters
    pub fn stats(&self) -> QueueStats {
        self.observe().stats()
    }
}

impl<T> fmt::Debug for BoundedQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.stats();
        f.debug_struct("BoundedQueue")
            .field("capacity", &stats.capacity)
            .field("len", &stats.len)
            .field("closed", &stats.closed)
            .finish_non_exhaustive()
    }
}
