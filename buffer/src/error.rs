//! Error types for buffer operations.

use std::error::Error;
use std::fmt;

/// Buffer operation error.
///
/// Returned by construction and by the cancellable/timed dequeue operations.
/// Neither `Cancelled` nor `TimedOut` is fatal to the buffer; the buffer
/// stays consistent and usable after either.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BufferError {
    /// The requested capacity is below the minimum of 1.
    #[error("buffer: invalid capacity {0} (must be at least 1)")]
    InvalidCapacity(usize),
    /// A blocking operation was cancelled through its [`CancelToken`].
    ///
    /// [`CancelToken`]: crate::CancelToken
    #[error("buffer: operation cancelled")]
    Cancelled,
    /// A timed operation did not complete before its deadline.
    #[error("buffer: operation timed out")]
    TimedOut,
}

/// Failed enqueue carrying the rejected value.
///
/// A `put` that gives up (cancellation or timeout) must not drop the value it
/// was asked to enqueue, so the value travels back to the caller inside the
/// error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PutError<T> {
    /// The enqueue was cancelled through its token.
    Cancelled(T),
    /// The enqueue did not find space before its deadline.
    TimedOut(T),
}

impl<T> fmt::Display for PutError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PutError::Cancelled(_) => write!(f, "buffer: put cancelled"),
            PutError::TimedOut(_) => write!(f, "buffer: put timed out"),
        }
    }
}

impl<T: fmt::Debug> Error for PutError<T> {}

impl<T> PutError<T> {
    /// Consumes the error, returning the value that was not enqueued.
    pub fn into_inner(self) -> T {
        match self {
            PutError::Cancelled(value) | PutError::TimedOut(value) => value,
        }
    }
}

impl<T> From<PutError<T>> for BufferError {
    fn from(err: PutError<T>) -> Self {
        match err {
            PutError::Cancelled(_) => BufferError::Cancelled,
            PutError::TimedOut(_) => BufferError::TimedOut,
        }
    }
}
