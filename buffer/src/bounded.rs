//! Fixed-capacity blocking circular buffer.

use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

use crate::cancel::{CancelToken, WakeWaiters};
use crate::error::{BufferError, PutError};

/// A thread-safe fixed-capacity blocking buffer.
///
/// `BoundedBuffer<T>` is a circular buffer with a fixed capacity that blocks
/// on `put` when full and blocks on `take` when empty, providing two-sided
/// flow control between any number of producer and consumer threads. Values
/// dequeue in the order they were enqueued.
///
/// All ring state (`slots`, `head`, `tail`, `count`) changes together under
/// one mutex; the capacity invariant spans all four fields, so they are never
/// locked separately. Two independent condition variables carry the "not
/// full" and "not empty" signals, so producers and consumers never wake each
/// other's waiter class by mistake.
///
/// # Example
///
/// ```
/// use conveyor_buffer::BoundedBuffer;
///
/// let buf = BoundedBuffer::new(3).unwrap();
/// buf.put(1);
/// buf.put(2);
/// buf.put(3);
/// assert!(buf.is_full());
///
/// assert_eq!(buf.take(), 1);
/// assert_eq!(buf.len(), 2);
/// ```
pub struct BoundedBuffer<T> {
    inner: Arc<Inner<T>>,
}

pub(crate) struct Inner<T> {
    state: Mutex<RingState<T>>,
    not_full: Condvar,
    not_empty: Condvar,
}

struct RingState<T> {
    slots: Vec<Option<T>>,
    head: usize,  // read position
    tail: usize,  // write position
    count: usize, // occupied slots, 0..=capacity
}

impl<T> RingState<T> {
    fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn is_full(&self) -> bool {
        self.count == self.slots.len()
    }

    fn enqueue(&mut self, value: T) {
        let tail = self.tail;
        self.slots[tail] = Some(value);
        self.tail = (tail + 1) % self.slots.len();
        self.count += 1;
    }

    fn dequeue(&mut self) -> T {
        let head = self.head;
        let value = self.slots[head].take().unwrap();
        self.head = (head + 1) % self.slots.len();
        self.count -= 1;
        value
    }
}

impl<T> Clone for BoundedBuffer<T> {
    fn clone(&self) -> Self {
        BoundedBuffer {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> BoundedBuffer<T> {
    /// Creates a new BoundedBuffer with the specified capacity.
    ///
    /// Returns [`BufferError::InvalidCapacity`] when `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, BufferError> {
        if capacity == 0 {
            return Err(BufferError::InvalidCapacity(capacity));
        }
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);

        Ok(BoundedBuffer {
            inner: Arc::new(Inner {
                state: Mutex::new(RingState {
                    slots,
                    head: 0,
                    tail: 0,
                    count: 0,
                }),
                not_full: Condvar::new(),
                not_empty: Condvar::new(),
            }),
        })
    }

    /// Creates a BoundedBuffer from an existing Vec.
    ///
    /// The Vec's length determines the buffer capacity. The buffer is created
    /// full, so the next `put` blocks until some value is taken. Returns
    /// [`BufferError::InvalidCapacity`] when the Vec is empty.
    pub fn from_vec(values: Vec<T>) -> Result<Self, BufferError> {
        if values.is_empty() {
            return Err(BufferError::InvalidCapacity(0));
        }
        let count = values.len();
        let slots: Vec<Option<T>> = values.into_iter().map(Some).collect();

        Ok(BoundedBuffer {
            inner: Arc::new(Inner {
                state: Mutex::new(RingState {
                    slots,
                    head: 0,
                    tail: 0, // count == capacity, so the next write slot wraps to 0
                    count,
                }),
                not_full: Condvar::new(),
                not_empty: Condvar::new(),
            }),
        })
    }

    /// Enqueues a value, blocking while the buffer is full.
    ///
    /// Suspension releases the lock; the condition is re-checked in a loop on
    /// every wakeup, so spurious wakeups and multi-waiter races are handled.
    pub fn put(&self, value: T) {
        let mut state = self.inner.state.lock().unwrap();
        while state.is_full() {
            state = self.inner.not_full.wait(state).unwrap();
        }
        state.enqueue(value);
        self.inner.not_empty.notify_one();
    }

    /// Dequeues the oldest value, blocking while the buffer is empty.
    pub fn take(&self) -> T {
        let mut state = self.inner.state.lock().unwrap();
        while state.count == 0 {
            state = self.inner.not_empty.wait(state).unwrap();
        }
        let value = state.dequeue();
        self.inner.not_full.notify_one();
        value
    }

    /// Enqueues a value, blocking while the buffer is full, unless `token`
    /// is cancelled.
    ///
    /// Cancellation is observed on entry and after every wakeup, before the
    /// value is written. A cancelled put leaves the buffer untouched and
    /// returns the value inside [`PutError::Cancelled`].
    pub fn put_with(&self, value: T, token: &CancelToken) -> Result<(), PutError<T>> {
        let mut state = self.inner.state.lock().unwrap();
        loop {
            if token.is_cancelled() {
                return Err(PutError::Cancelled(value));
            }
            if !state.is_full() {
                break;
            }
            state = self.inner.not_full.wait(state).unwrap();
        }
        state.enqueue(value);
        self.inner.not_empty.notify_one();
        Ok(())
    }

    /// Dequeues the oldest value, blocking while the buffer is empty, unless
    /// `token` is cancelled.
    ///
    /// A cancelled take consumes nothing and returns
    /// [`BufferError::Cancelled`].
    pub fn take_with(&self, token: &CancelToken) -> Result<T, BufferError> {
        let mut state = self.inner.state.lock().unwrap();
        loop {
            if token.is_cancelled() {
                return Err(BufferError::Cancelled);
            }
            if state.count > 0 {
                break;
            }
            state = self.inner.not_empty.wait(state).unwrap();
        }
        let value = state.dequeue();
        self.inner.not_full.notify_one();
        Ok(value)
    }

    /// Attempts to enqueue without blocking.
    ///
    /// Returns the value back as `Err` when the buffer is full.
    pub fn try_put(&self, value: T) -> Result<(), T> {
        let mut state = self.inner.state.lock().unwrap();
        if state.is_full() {
            return Err(value);
        }
        state.enqueue(value);
        self.inner.not_empty.notify_one();
        Ok(())
    }

    /// Attempts to dequeue without blocking.
    ///
    /// Returns `None` when the buffer is empty.
    pub fn try_take(&self) -> Option<T> {
        let mut state = self.inner.state.lock().unwrap();
        if state.count == 0 {
            return None;
        }
        let value = state.dequeue();
        self.inner.not_full.notify_one();
        Some(value)
    }

    /// Enqueues a value, giving up after `timeout` if no space opens.
    ///
    /// The deadline is fixed up front, so repeated wakeups cannot extend the
    /// wait. A timed-out put returns the value inside [`PutError::TimedOut`].
    pub fn put_timeout(&self, value: T, timeout: Duration) -> Result<(), PutError<T>> {
        let deadline = Instant::now() + timeout;
        let mut state = self.inner.state.lock().unwrap();
        while state.is_full() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(PutError::TimedOut(value));
            }
            state = self.inner.not_full.wait_timeout(state, remaining).unwrap().0;
        }
        state.enqueue(value);
        self.inner.not_empty.notify_one();
        Ok(())
    }

    /// Dequeues the oldest value, giving up after `timeout` if none arrives.
    pub fn take_timeout(&self, timeout: Duration) -> Result<T, BufferError> {
        let deadline = Instant::now() + timeout;
        let mut state = self.inner.state.lock().unwrap();
        while state.count == 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(BufferError::TimedOut);
            }
            state = self.inner.not_empty.wait_timeout(state, remaining).unwrap().0;
        }
        let value = state.dequeue();
        self.inner.not_full.notify_one();
        Ok(value)
    }

    /// Returns the number of values currently in the buffer.
    pub fn len(&self) -> usize {
        let state = self.inner.state.lock().unwrap();
        state.count
    }

    /// Returns the buffer capacity.
    pub fn capacity(&self) -> usize {
        let state = self.inner.state.lock().unwrap();
        state.capacity()
    }

    /// Returns true if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if the buffer is full.
    pub fn is_full(&self) -> bool {
        let state = self.inner.state.lock().unwrap();
        state.is_full()
    }
}

impl<T: Send + 'static> BoundedBuffer<T> {
    /// Creates a [`CancelToken`] tied to this buffer.
    ///
    /// Cancelling the token wakes every thread blocked on this buffer;
    /// operations passed the token abort, other waiters re-check their
    /// condition and keep waiting.
    pub fn cancel_token(&self) -> CancelToken {
        CancelToken::new(Arc::clone(&self.inner) as Arc<dyn WakeWaiters>)
    }
}

impl<T: Clone> BoundedBuffer<T> {
    /// Returns a copy of all buffered values in FIFO order.
    pub fn to_vec(&self) -> Vec<T> {
        let state = self.inner.state.lock().unwrap();
        let mut result = Vec::with_capacity(state.count);

        let mut idx = state.head;
        for _ in 0..state.count {
            if let Some(ref value) = state.slots[idx] {
                result.push(value.clone());
            }
            idx = (idx + 1) % state.slots.len();
        }

        result
    }
}

impl<T: Send> WakeWaiters for Inner<T> {
    fn wake_all(&self) {
        // The cancel flag is stored before this runs. Holding the state lock
        // while notifying means a waiter that saw the flag unset cannot
        // suspend after these notifications and miss them.
        let _state = self.state.lock().unwrap();
        self.not_full.notify_all();
        self.not_empty.notify_all();
    }
}
