//! Synchronization utilities for robust mutex handling
//!
//! Mutex and condition variable operations return `LockResult`s that are
//! poisoned when another thread panicked while holding the lock. These helpers
//! turn that into an application error (for operations that mutate shared
//! state) or recover the guard (for read-only observers).

use std::sync::{LockResult, PoisonError};

/// Convert a poisoned lock or wait result into an application error
///
/// Works for anything that yields a `LockResult`: `Mutex::lock`,
/// `Condvar::wait` and `Condvar::wait_timeout` alike.
///
/// # Examples
/// ```
/// use std::sync::Mutex;
/// use pcqueue::core::sync::handle_mutex_poison;
/// use pcqueue::queue::QueueError;
///
/// let mutex = Mutex::new(42);
/// let guard = handle_mutex_poison(
///     mutex.lock(),
///     |message| QueueError::Poisoned { message }
/// ).unwrap();
/// assert_eq!(*guard, 42);
/// ```
pub fn handle_mutex_poison<T, E>(
    result: LockResult<T>,
    error_constructor: impl FnOnce(String) -> E,
) -> Result<T, E> {
    result.map_err(|poison_err| {
        error_constructor(format!(
            "Internal synchronisation error (mutex poisoned). A thread panicked while holding the lock. PoisonError: {:?}",
            poison_err
        ))
    })
}

/// Take the guard even if the lock is poisoned
///
/// Only for callers that read state and cannot leave it half-updated.
pub fn recover_poison<T>(result: LockResult<T>) -> T {
    result.unwrap_or_else(PoisonError::into_inner)
}
