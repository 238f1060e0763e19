//! Channel-like queue whose state can be observed by matchers.
//!
//! This module provides:
//!
//! - [`Channel`] - bidirectional handle, bounded or unbounded
//! - [`Sender`] / [`Receiver`] - direction-restricted views of a channel
//! - [`QueueRef`] - the type-erased handle stored in a [`Value`](crate::format::Value)
//!
//! Every handle implements [`Inspect`](crate::format::Inspect), so a channel
//! can be the subject of an assertion and its length, capacity and direction
//! show up in failure messages.
//!
//! # Example
//!
//! ```rust
//! use matchkit::queue::Channel;
//!
//! let (tx, rx) = Channel::<i32>::unbounded().split();
//!
//! tx.send(1).unwrap();
//! tx.send(2).unwrap();
//!
//! assert_eq!(rx.len(), 2);
//! assert_eq!(rx.try_recv().unwrap(), 1);
//! ```

mod channel;
mod handle;

pub use channel::{
    Channel, Receiver, RecvError, RecvFuture, SendFuture, Sender, TryRecvError, TrySendError,
};
pub use handle::{Direction, QueueRef};

pub(crate) use handle::ProbeError;
