//! Error definitions
//!
//! This module provides error types for matchkit.
//!
//! A matcher that returns `Ok(false)` reports an ordinary non-match. Every
//! variant here is a usage error instead: the match could not be evaluated,
//! retrying will not help, and negating the assertion does not hide it.

use std::time::Duration;

use thiserror::Error;

/// Main error type for matchkit
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Assertion failed
    #[error("Assertion failed: {0}")]
    AssertionFailed(String),

    /// A polled assertion never succeeded before its deadline.
    #[error("Timed out after {elapsed:?}.\n{message}")]
    Timeout {
        /// Time spent polling.
        elapsed: Duration,
        /// Failure message from the last attempt.
        message: String,
    },

    /// The matcher cannot evaluate values of this shape.
    #[error("{matcher} matcher expects {expected}.  Got:\n{actual}")]
    UnexpectedType {
        /// Matcher name.
        matcher: &'static str,
        /// Description of the accepted shape.
        expected: &'static str,
        /// Formatted actual value.
        actual: String,
    },

    /// The actual value is a channel that cannot be received from.
    #[error("Receive matcher cannot be passed a send-only channel.  Got:\n{actual}")]
    NotReceivable {
        /// Formatted actual value.
        actual: String,
    },

    /// The channel is closed and nothing is left in its buffer.
    #[error("Receive matcher was given a closed channel with nothing left to receive:\n{actual}")]
    ChannelClosed {
        /// Formatted actual value.
        actual: String,
    },

    /// The destination is a plain value, not a slot that can be written.
    #[error("Cannot assign a value from the channel:\n{channel}\nTo:\n{destination}\nYou need to pass a mutable reference!")]
    DestinationNotAssignable {
        /// Formatted channel value.
        channel: String,
        /// Formatted destination value.
        destination: String,
    },

    /// The destination's type differs from the channel's element type.
    #[error("Cannot assign a value from the channel:\n{channel}\nTo a destination of type {destination} (channel carries {element})")]
    DestinationTypeMismatch {
        /// Formatted channel value.
        channel: String,
        /// Destination type name.
        destination: String,
        /// Channel element type name.
        element: String,
    },

    /// Both sides of an equality check are nil.
    #[error("Refusing to compare <nil> to <nil>.")]
    NilComparison,
}

impl Error {
    /// Create an unexpected type error.
    #[must_use]
    pub fn unexpected_type(
        matcher: &'static str,
        expected: &'static str,
        actual: impl Into<String>,
    ) -> Self {
        Self::UnexpectedType {
            matcher,
            expected,
            actual: actual.into(),
        }
    }

    /// Whether this error reports a failed assertion rather than a usage error.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::AssertionFailed(_) | Self::Timeout { .. })
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
