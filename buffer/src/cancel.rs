//! Cancellation for blocked buffer operations.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// One-method hook for waking every waiter of a buffer.
///
/// Implemented by the buffer internals; the token holds it as a trait object
/// so the token itself stays independent of the buffer's element type.
pub(crate) trait WakeWaiters: Send + Sync {
    fn wake_all(&self);
}

/// Cancellation handle for blocking operations on one buffer.
///
/// Created by [`BoundedBuffer::cancel_token`]. Cloning shares the token, so
/// one `cancel()` call is visible to every operation holding a clone.
/// Cancellation is sticky: once cancelled, every cancellable operation using
/// this token fails with a cancellation error, including ones that have not
/// started yet.
///
/// Cancellation is scoped to the token, not the buffer. Waiters using a
/// different token (or none) are woken spuriously, re-check their condition
/// and go back to waiting; the buffer itself stays fully usable.
///
/// [`BoundedBuffer::cancel_token`]: crate::BoundedBuffer::cancel_token
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
    target: Arc<dyn WakeWaiters>,
}

impl CancelToken {
    pub(crate) fn new(target: Arc<dyn WakeWaiters>) -> Self {
        CancelToken {
            cancelled: Arc::new(AtomicBool::new(false)),
            target,
        }
    }

    /// Cancels every pending and future operation using this token.
    ///
    /// The flag is raised before the buffer's waiters are woken, so a blocked
    /// operation cannot observe the wakeup without also observing the flag.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.target.wake_all();
    }

    /// Returns true if `cancel` has been called on this token or a clone.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl Clone for CancelToken {
    fn clone(&self) -> Self {
        CancelToken {
            cancelled: Arc::clone(&self.cancelled),
            target: Arc::clone(&self.target),
        }
    }
}

impl fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::{BoundedBuffer, BufferError, PutError};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_token_starts_clear() {
        let buf = BoundedBuffer::<i32>::new(2).unwrap();
        let token = buf.cancel_token();
        assert!(!token.is_cancelled());
    }

    #[test]
    fn test_cancel_is_sticky_and_shared() {
        let buf = BoundedBuffer::<i32>::new(2).unwrap();
        let token = buf.cancel_token();
        let clone = token.clone();

        clone.cancel();
        assert!(token.is_cancelled());
        assert!(clone.is_cancelled());
    }

    #[test]
    fn test_cancel_unblocks_take() {
        let buf = BoundedBuffer::<i32>::new(2).unwrap();
        let token = buf.cancel_token();

        let waiter_buf = buf.clone();
        let waiter_token = token.clone();
        let waiter = thread::spawn(move || waiter_buf.take_with(&waiter_token));

        thread::sleep(Duration::from_millis(50));
        token.cancel();

        assert_eq!(waiter.join().unwrap(), Err(BufferError::Cancelled));
        // Nothing was consumed
        assert_eq!(buf.len(), 0);
    }

    #[test]
    fn test_cancel_unblocks_put() {
        let buf = BoundedBuffer::new(1).unwrap();
        buf.put(1);
        let token = buf.cancel_token();

        let waiter_buf = buf.clone();
        let waiter_token = token.clone();
        let waiter = thread::spawn(move || waiter_buf.put_with(2, &waiter_token));

        thread::sleep(Duration::from_millis(50));
        token.cancel();

        match waiter.join().unwrap() {
            Err(PutError::Cancelled(v)) => assert_eq!(v, 2),
            other => panic!("expected cancellation, got {other:?}"),
        }
        // Nothing was written
        assert_eq!(buf.len(), 1);
        assert_eq!(buf.take(), 1);
    }

    #[test]
    fn test_cancelled_token_fails_fast() {
        let buf = BoundedBuffer::new(2).unwrap();
        buf.put(1);

        let token = buf.cancel_token();
        token.cancel();

        // Observed on entry, even though the take could complete without
        // blocking
        assert_eq!(buf.take_with(&token), Err(BufferError::Cancelled));
        assert_eq!(buf.len(), 1);
    }

    #[test]
    fn test_buffer_usable_after_cancellation() {
        let buf = BoundedBuffer::<i32>::new(2).unwrap();
        let token = buf.cancel_token();

        let waiter_buf = buf.clone();
        let waiter_token = token.clone();
        let waiter = thread::spawn(move || waiter_buf.take_with(&waiter_token));
        thread::sleep(Duration::from_millis(50));
        token.cancel();
        waiter.join().unwrap().unwrap_err();

        // A fresh token and the plain operations keep working
        buf.put(10);
        buf.put(11);
        let fresh = buf.cancel_token();
        assert_eq!(buf.take_with(&fresh), Ok(10));
        assert_eq!(buf.take(), 11);
    }

    #[test]
    fn test_cancel_only_affects_its_token() {
        let buf = BoundedBuffer::<i32>::new(2).unwrap();
        let cancelled_token = buf.cancel_token();
        let live_token = buf.cancel_token();

        let waiter_buf = buf.clone();
        let waiter_token = live_token.clone();
        let waiter = thread::spawn(move || waiter_buf.take_with(&waiter_token));

        thread::sleep(Duration::from_millis(50));
        // Wakes the waiter spuriously; it re-checks and keeps waiting
        cancelled_token.cancel();
        thread::sleep(Duration::from_millis(50));

        buf.put(5);
        assert_eq!(waiter.join().unwrap(), Ok(5));
    }
}
