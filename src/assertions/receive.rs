// Allow must_use_candidate for matcher factory functions since returning the matcher
// without using it is the common pattern for test setup
#![allow(clippy::must_use_candidate)]

//! Matcher that takes one value off a channel without blocking.
//!
//! Each call to [`Matcher::matches`] makes exactly one non-blocking attempt:
//!
//! | channel state                  | outcome        |
//! |--------------------------------|----------------|
//! | value buffered (open or closed)| `Ok(true)`     |
//! | open, nothing buffered         | `Ok(false)`    |
//! | closed, nothing buffered       | `Err(_)`       |
//! | send-only view, nil, non-channel | `Err(_)`     |
//!
//! An empty channel is a plain non-match, so [`eventually`](fn@super::eventually)
//! can keep polling until a producer catches up.
//!
//! # Example
//!
//! ```rust
//! use matchkit::assertions::receive::receive_into;
//! use matchkit::expect;
//! use matchkit::queue::Channel;
//!
//! let channel = Channel::<i32>::bounded(1);
//! channel.send(17).unwrap();
//!
//! let mut value = 0;
//! expect(&channel).to(receive_into(&mut value));
//! assert_eq!(value, 17);
//! ```

use std::any::Any;
use std::fmt;

use tracing::{debug, trace};

use super::matcher::Matcher;
use crate::error::{Error, Result};
use crate::format::{message, object, short_type_name, Kind, Value};
use crate::queue::{ProbeError, QueueRef};

/// Where a received value is written.
///
/// Built from `&mut T` (an assignable slot) or from a [`Value`], which
/// cannot be written to and makes the matcher report a usage error.
pub enum Destination<'a> {
    /// A mutable slot of a concrete type.
    Slot {
        /// The slot.
        slot: &'a mut dyn Any,
        /// Name of the slot's type.
        type_name: String,
    },
    /// A plain value; not assignable.
    Value(Value),
}

impl<'a, T: Any> From<&'a mut T> for Destination<'a> {
    fn from(slot: &'a mut T) -> Self {
        Self::Slot {
            slot,
            type_name: short_type_name(std::any::type_name::<T>()),
        }
    }
}

impl From<Value> for Destination<'_> {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl fmt::Debug for Destination<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Slot { type_name, .. } => f.debug_tuple("Slot").field(type_name).finish(),
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
        }
    }
}

/// Create a matcher that succeeds when a value can be received.
///
/// The received value is discarded.
///
/// # Example
///
/// ```rust
/// use matchkit::assertions::matcher::Matcher;
/// use matchkit::assertions::receive::receive;
/// use matchkit::format::Inspect;
/// use matchkit::queue::Channel;
///
/// let channel = Channel::<bool>::bounded(1);
/// assert_eq!(receive().matches(&channel.inspect()), Ok(false));
///
/// channel.send(true).unwrap();
/// assert_eq!(receive().matches(&channel.inspect()), Ok(true));
/// ```
pub fn receive() -> ReceiveMatcher<'static> {
    ReceiveMatcher { destination: None }
}

/// Create a matcher that writes the received value to `destination`.
///
/// The destination's type must be the channel's element type; otherwise the
/// matcher errors and leaves both the destination and the channel untouched.
pub fn receive_into<'a>(destination: impl Into<Destination<'a>>) -> ReceiveMatcher<'a> {
    ReceiveMatcher {
        destination: Some(destination.into()),
    }
}

/// Matcher that receives from a channel.
#[derive(Debug)]
pub struct ReceiveMatcher<'a> {
    destination: Option<Destination<'a>>,
}

impl ReceiveMatcher<'_> {
    fn channel<'v>(actual: &'v Value) -> Result<&'v QueueRef> {
        let Kind::Queue(queue) = actual.kind() else {
            return Err(Error::unexpected_type(
                "Receive",
                "a channel",
                object(actual, 1),
            ));
        };
        if !queue.direction().can_receive() {
            return Err(Error::NotReceivable {
                actual: object(actual, 1),
            });
        }
        Ok(queue)
    }

    fn slot(&mut self, actual: &Value, queue: &QueueRef) -> Result<Option<&mut dyn Any>> {
        match &mut self.destination {
            None => Ok(None),
            Some(Destination::Value(value)) => Err(Error::DestinationNotAssignable {
                channel: object(actual, 1),
                destination: object(value, 1),
            }),
            Some(Destination::Slot { slot, type_name }) => {
                if queue.accepts(&**slot) {
                    Ok(Some(&mut **slot))
                } else {
                    Err(Error::DestinationTypeMismatch {
                        channel: object(actual, 1),
                        destination: type_name.clone(),
                        element: queue.element_type(),
                    })
                }
            }
        }
    }
}

impl Matcher for ReceiveMatcher<'_> {
    fn matches(&mut self, actual: &Value) -> Result<bool> {
        let queue = Self::channel(actual)?;
        let slot = self.slot(actual, queue)?;

        trace!(
            direction = ?queue.direction(),
            len = queue.len(),
            into = slot.is_some(),
            "probing channel"
        );

        match queue.try_recv_into(slot) {
            Ok(()) => {
                debug!(element = %queue.element_type(), "received value from channel");
                Ok(true)
            }
            Err(ProbeError::Empty) => {
                debug!("channel is empty");
                Ok(false)
            }
            Err(ProbeError::Closed) => {
                debug!("channel is closed and drained");
                Err(Error::ChannelClosed {
                    actual: object(actual, 1),
                })
            }
            // `slot` already checked the element type.
            Err(ProbeError::Mismatch) => Err(Error::DestinationTypeMismatch {
                channel: object(actual, 1),
                destination: self.destination_type(),
                element: queue.element_type(),
            }),
        }
    }

    fn failure_message(&self, actual: &Value) -> String {
        message(actual, "to receive something", None)
    }

    fn negated_failure_message(&self, actual: &Value) -> String {
        message(actual, "not to receive anything", None)
    }
}

impl ReceiveMatcher<'_> {
    fn destination_type(&self) -> String {
        match &self.destination {
            Some(Destination::Slot { type_name, .. }) => type_name.clone(),
            Some(Destination::Value(value)) => value.type_name().unwrap_or("nil").to_string(),
            None => "nothing".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Inspect;
    use crate::queue::Channel;

    #[test]
    fn test_buffered_channel() {
        let channel = Channel::<bool>::bounded(1);
        let actual = channel.inspect();

        assert_eq!(receive().matches(&actual), Ok(false));
        channel.send(true).unwrap();
        assert_eq!(receive().matches(&actual), Ok(true));
        assert_eq!(receive().matches(&actual), Ok(false));
    }

    #[test]
    fn test_repeated_empty_probes_are_harmless() {
        let channel = Channel::<i32>::unbounded();
        let actual = channel.inspect();
        let mut m = receive();

        for _ in 0..5 {
            assert_eq!(m.matches(&actual), Ok(false));
        }
        assert!(!channel.is_closed());
        assert!(channel.is_empty());
    }

    #[test]
    fn test_writes_into_destination() {
        let channel = Channel::<i32>::bounded(1);
        let mut value = 0;

        assert_eq!(receive_into(&mut value).matches(&channel.inspect()), Ok(false));
        assert_eq!(value, 0);

        channel.send(17).unwrap();
        assert_eq!(receive_into(&mut value).matches(&channel.inspect()), Ok(true));
        assert_eq!(value, 17);
    }

    #[test]
    fn test_destinations_of_various_types() {
        let strings = Channel::<String>::bounded(1);
        strings.send("foo".to_string()).unwrap();
        let mut s = String::new();
        assert_eq!(receive_into(&mut s).matches(&strings.inspect()), Ok(true));
        assert_eq!(s, "foo");

        let vectors = Channel::<Vec<bool>>::bounded(1);
        vectors.send(vec![true, true, false]).unwrap();
        let mut v: Vec<bool> = Vec::new();
        assert_eq!(receive_into(&mut v).matches(&vectors.inspect()), Ok(true));
        assert_eq!(v, vec![true, true, false]);

        let channels = Channel::<Channel<bool>>::bounded(1);
        let inner = Channel::<bool>::unbounded();
        channels.send(inner.clone()).unwrap();
        let mut slot = Channel::<bool>::unbounded();
        assert_eq!(receive_into(&mut slot).matches(&channels.inspect()), Ok(true));
        assert_eq!(slot.inspect(), inner.inspect());

        let boxed = Channel::<Box<dyn Fn() -> u8 + Send>>::bounded(1);
        boxed.send(Box::new(|| 7)).unwrap();
        let mut f: Box<dyn Fn() -> u8 + Send> = Box::new(|| 0);
        assert_eq!(receive_into(&mut f).matches(&boxed.inspect()), Ok(true));
        assert_eq!(f(), 7);
    }

    #[test]
    fn test_type_mismatch_leaves_everything_untouched() {
        let channel = Channel::<i32>::bounded(1);
        channel.send(17).unwrap();
        let mut wrong = false;

        let err = receive_into(&mut wrong)
            .matches(&channel.inspect())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::DestinationTypeMismatch { ref destination, ref element, .. }
                if destination == "bool" && element == "i32"
        ));
        assert!(!wrong);
        assert_eq!(channel.len(), 1);
    }

    #[test]
    fn test_type_mismatch_on_empty_channel() {
        let channel = Channel::<i32>::bounded(1);
        let mut wrong = false;
        assert!(receive_into(&mut wrong).matches(&channel.inspect()).is_err());
    }

    #[test]
    fn test_unassignable_destination() {
        let channel = Channel::<i32>::bounded(1);
        channel.send(1).unwrap();

        let err = receive_into(5i32.inspect())
            .matches(&channel.inspect())
            .unwrap_err();
        assert!(matches!(err, Error::DestinationNotAssignable { .. }));
        assert!(err.to_string().contains("You need to pass a mutable reference!"));
        assert_eq!(channel.len(), 1);
    }

    #[test]
    fn test_closed_channel_with_buffered_value() {
        let channel = Channel::<bool>::bounded(1);
        channel.send(true).unwrap();
        channel.close();

        let actual = channel.inspect();
        assert_eq!(receive().matches(&actual), Ok(true));
        assert!(matches!(
            receive().matches(&actual),
            Err(Error::ChannelClosed { .. })
        ));
    }

    #[test]
    fn test_closed_drained_channel() {
        let channel = Channel::<bool>::unbounded();
        channel.close();
        assert!(matches!(
            receive().matches(&channel.inspect()),
            Err(Error::ChannelClosed { .. })
        ));
    }

    #[test]
    fn test_send_only_view() {
        let channel = Channel::<bool>::bounded(1);
        channel.send(true).unwrap();

        let err = receive().matches(&channel.sender().inspect()).unwrap_err();
        assert!(matches!(err, Error::NotReceivable { .. }));
        // The buffered value is still there.
        assert_eq!(channel.len(), 1);
    }

    #[test]
    fn test_receive_only_view() {
        let (tx, rx) = Channel::<bool>::bounded(1).split();
        tx.send(true).unwrap();
        assert_eq!(receive().matches(&rx.inspect()), Ok(true));
    }

    #[test]
    fn test_non_channels() {
        let nil_channel: Option<Channel<bool>> = None;
        assert!(matches!(
            receive().matches(&crate::format::Inspect::inspect(&nil_channel)),
            Err(Error::UnexpectedType { .. })
        ));
        assert!(receive().matches(&Value::nil()).is_err());

        let err = receive().matches(&3i32.inspect()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Receive matcher expects a channel.  Got:\n    <i32>: 3"
        );
    }

    #[test]
    fn test_messages() {
        let channel = Channel::<bool>::bounded(1);
        let actual = channel.inspect();
        let failure = receive().failure_message(&actual);
        assert!(failure.starts_with("Expected\n    <Channel<bool> | len:0, cap:1>: 0x"));
        assert!(failure.ends_with("\nto receive something"));
        assert!(receive()
            .negated_failure_message(&actual)
            .ends_with("\nnot to receive anything"));
    }
}
