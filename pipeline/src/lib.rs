//! Producer and consumer thread helpers for conveyor buffers.
//!
//! A producer is a value-generation callback invoked repeatedly, each result
//! passed to `put`; a consumer is a value-consumption callback invoked
//! repeatedly with the result of `take`. This crate spawns those loops on
//! their own threads and hands the `JoinHandle`s back, so thread lifecycle
//! and join semantics stay with the caller.
//!
//! Shutdown runs through a [`CancelToken`]: cancelling it stops producers
//! (they report a cancellation error) and consumers (they stop draining and
//! report how many values they consumed).
//!
//! # Example
//!
//! ```
//! use conveyor_buffer::BoundedBuffer;
//! use conveyor_pipeline::{spawn_consumer, spawn_producer};
//! use std::sync::{Arc, Mutex};
//! use std::time::Duration;
//!
//! let buf = BoundedBuffer::new(4).unwrap();
//! let token = buf.cancel_token();
//!
//! let mut next = 0;
//! let producer = spawn_producer(buf.clone(), token.clone(), move || {
//!     next += 1;
//!     if next <= 10 { Some(next) } else { None }
//! });
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//! let consumer = spawn_consumer(buf.clone(), token.clone(), move |value| {
//!     sink.lock().unwrap().push(value);
//! });
//!
//! assert_eq!(producer.join().unwrap().unwrap(), 10);
//!
//! // Let the consumer drain the tail, then stop it
//! while !buf.is_empty() {
//!     std::thread::sleep(Duration::from_millis(1));
//! }
//! token.cancel();
//!
//! assert_eq!(consumer.join().unwrap(), 10);
//! assert_eq!(*seen.lock().unwrap(), (1..=10).collect::<Vec<i32>>());
//! ```

use std::thread::{self, JoinHandle};

use conveyor_buffer::{BoundedBuffer, BufferError, CancelToken};
use tracing::{debug, trace};

/// Spawns a producer thread feeding `source` values into the buffer.
///
/// The callback is invoked repeatedly; each `Some(value)` is enqueued with
/// `put_with`, blocking while the buffer is full. The thread stops when the
/// callback returns `None` (resolving to the number of values enqueued) or
/// when `token` is cancelled (resolving to [`BufferError::Cancelled`]).
pub fn spawn_producer<T, F>(
    buffer: BoundedBuffer<T>,
    token: CancelToken,
    mut source: F,
) -> JoinHandle<Result<usize, BufferError>>
where
    T: Send + 'static,
    F: FnMut() -> Option<T> + Send + 'static,
{
    thread::spawn(move || {
        debug!("producer started");
        let mut produced = 0usize;
        while let Some(value) = source() {
            if let Err(err) = buffer.put_with(value, &token) {
                debug!(produced, "producer cancelled");
                return Err(err.into());
            }
            produced += 1;
            trace!(produced, "value enqueued");
        }
        debug!(produced, "producer finished");
        Ok(produced)
    })
}

/// Spawns a consumer thread draining the buffer into `sink`.
///
/// Each value taken from the buffer is passed to the callback; the take
/// blocks while the buffer is empty. Cancelling `token` is the normal way to
/// stop the consumer; the thread then resolves to the number of values it
/// consumed.
pub fn spawn_consumer<T, F>(
    buffer: BoundedBuffer<T>,
    token: CancelToken,
    mut sink: F,
) -> JoinHandle<usize>
where
    T: Send + 'static,
    F: FnMut(T) + Send + 'static,
{
    thread::spawn(move || {
        debug!("consumer started");
        let mut consumed = 0usize;
        while let Ok(value) = buffer.take_with(&token) {
            sink(value);
            consumed += 1;
            trace!(consumed, "value drained");
        }
        debug!(consumed, "consumer stopped");
        consumed
    })
}
