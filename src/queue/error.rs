//! Queue Error Types

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueueError {
    #[error("Queue capacity must be at least 1")]
    InvalidCapacity,

    #[error("Queue is closed")]
    Closed,

    #[error("Timed out waiting on the queue")]
    Timeout,

    #[error("Queue lock poisoned: {message}")]
    Poisoned { message: String },
}

impl QueueError {
    /// `true` for the expected end-of-work signal, which loops treat as "stop"
    pub fn is_closed(&self) -> bool {
        matches!(self, QueueError::Closed)
    }
}

/// Failure from the non-blocking and timed enqueue variants.
///
/// The item is always handed back so the caller can retry or drop it.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum TryEnqueueError<T> {
    #[error("Queue is full")]
    Full(T),

    #[error("Queue is closed")]
    Closed(T),

    #[error("Timed out waiting for queue capacity")]
    Timeout(T),

    #[error("Queue lock poisoned")]
    Poisoned(T),
}

impl<T> TryEnqueueError<T> {
    /// Recover the item that could not be enqueued
    pub fn into_inner(self) -> T {
        match self {
            TryEnqueueError::Full(item)
            | TryEnqueueError::Closed(item)
            | TryEnqueueError::Timeout(item)
            | TryEnqueueError::Poisoned(item) => item,
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, TryEnqueueError::Closed(_))
    }
}

/// Result type for queue operations
pub type QueueResult<T> = Result<T, QueueError>;
