//! Bounded Queue Component
//!
//! A fixed-capacity, thread-safe FIFO queue that connects producers to a pool
//! of consumer workers, with blocking on a full buffer, blocking on an empty
//! buffer, and a coordinated shutdown once production ends.
//!
//! # Overview
//!
//! - **Bounded**: capacity is fixed at creation; `enqueue` blocks while full
//! - **Strict FIFO**: the nth successful enqueue is the nth successful dequeue
//! - **Targeted wake-ups**: enqueue wakes one consumer, dequeue wakes one producer
//! - **Broadcast shutdown**: `close()` wakes every blocked thread
//! - **Drain before closed**: buffered items are still delivered after `close()`
//!
//! # Architecture
//!
//! ```text
//!  ┌──────────┐  enqueue                               dequeue  ┌────────────┐
//!  │ Producer │ ───────┐                             ┌───────── │ Consumer 1 │
//!  └──────────┘        ▼                             │          └────────────┘
//!              ┌───────────────────────────────────┐ │          ┌────────────┐
//!              │ Mutex ┌───┬───┬───┬───┬───┬───┐   │ ├───────── │ Consumer 2 │
//!              │       │ 4 │ 5 │ 6 │   │   │   │   │─┤          └────────────┘
//!              │       └───┴───┴───┴───┴───┴───┘   │ │          ┌────────────┐
//!              │        head ▲      tail ▲         │ └───────── │ Consumer N │
//!              │ not_full ◇         not_empty ◇    │            └────────────┘
//!              └───────────────────────────────────┘
//! ```
//!
//! # Example Usage
//!
//! ```rust
//! use pcqueue::queue::{BoundedQueue, QueueError};
//!
//! let queue = BoundedQueue::new(3)?;
//! queue.enqueue(1)?;
//! queue.enqueue(2)?;
//! queue.enqueue(3)?;
//! queue.close();
//!
//! // Buffered items survive shutdown
//! assert_eq!(queue.dequeue()?, 1);
//! assert_eq!(queue.dequeue()?, 2);
//! assert_eq!(queue.dequeue()?, 3);
//! assert_eq!(queue.dequeue(), Err(QueueError::Closed));
//! # Ok::<(), QueueError>(())
//! ```

pub mod api;
mod bounded;
mod error;
mod ring;
mod types;

pub use bounded::BoundedQueue;
pub use error::{QueueError, QueueResult, TryEnqueueError};
pub use types::QueueStats;

#[cfg(test)]
mod tests;
