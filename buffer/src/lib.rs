//! Fixed-capacity blocking buffer for producer-consumer handoff.
//!
//! This crate provides [`BoundedBuffer<T>`], a thread-safe circular buffer
//! with a fixed capacity and two-sided flow control: producers block when the
//! buffer is full, consumers block when it is empty. Any number of producer
//! and consumer threads may operate on the same buffer concurrently.
//!
//! # Semantics
//!
//! - **`put`**: Blocks while full, enqueues when a slot opens
//! - **`take`**: Blocks while empty, dequeues the oldest value
//! - **FIFO**: Values dequeue in the order they were enqueued
//!
//! Internally the buffer keeps one mutex over all ring state and two
//! separate condition variables, one for "not full" and one for "not empty",
//! so an enqueue only ever wakes a waiting consumer and a dequeue only ever
//! wakes a waiting producer.
//!
//! # Example
//!
//! ```
//! use conveyor_buffer::BoundedBuffer;
//! use std::thread;
//!
//! let buf = BoundedBuffer::new(4).unwrap();
//! let producer_buf = buf.clone();
//!
//! // Producer thread (will block whenever the buffer is full)
//! let producer = thread::spawn(move || {
//!     for i in 0..10 {
//!         producer_buf.put(i);
//!     }
//! });
//!
//! // Consumer on this thread
//! let mut items = Vec::new();
//! for _ in 0..10 {
//!     items.push(buf.take());
//! }
//!
//! producer.join().unwrap();
//! assert_eq!(items, (0..10).collect::<Vec<i32>>());
//! ```
//!
//! # Cancellation
//!
//! Blocking operations have cancellable variants (`put_with` / `take_with`)
//! driven by a [`CancelToken`]. Cancelling a token unblocks every waiter on
//! the associated buffer; a cancelled operation aborts without touching the
//! buffer, so the buffer stays consistent and fully usable afterwards.
//!
//! ```
//! use conveyor_buffer::{BoundedBuffer, BufferError};
//! use std::{thread, time::Duration};
//!
//! let buf = BoundedBuffer::<u32>::new(1).unwrap();
//! let token = buf.cancel_token();
//!
//! let waiter_buf = buf.clone();
//! let waiter_token = token.clone();
//! let waiter = thread::spawn(move || waiter_buf.take_with(&waiter_token));
//!
//! thread::sleep(Duration::from_millis(20));
//! token.cancel();
//!
//! assert!(matches!(waiter.join().unwrap(), Err(BufferError::Cancelled)));
//! assert_eq!(buf.len(), 0); // nothing was consumed
//! ```
//!
//! # Non-blocking and timed variants
//!
//! `try_put` / `try_take` never block; `put_timeout` / `take_timeout` give up
//! after a deadline. A rejected `put` always hands the value back to the
//! caller, nothing is dropped silently.
//!
//! # Thread Safety
//!
//! [`BoundedBuffer<T>`] is `Send + Sync` and can be shared between threads
//! using `Clone` (which shares the underlying ring via `Arc`).

mod bounded;
mod cancel;
mod error;

pub use bounded::BoundedBuffer;
pub use cancel::CancelToken;
pub use error::{BufferError, PutError};
