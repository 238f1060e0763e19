//! Polling assertions.
//!
//! [`eventually`] re-evaluates a matcher on the calling thread until it
//! agrees, the matcher reports a usage error, or the deadline passes. The
//! subject is re-inspected on every attempt, so live values such as channels
//! and shared references are observed as they change.
//!
//! # Example
//!
//! ```rust
//! use std::thread;
//! use std::time::Duration;
//!
//! use matchkit::assertions::receive::receive_into;
//! use matchkit::eventually;
//! use matchkit::queue::Channel;
//!
//! let channel = Channel::<String>::unbounded();
//! let tx = channel.sender();
//! thread::spawn(move || {
//!     thread::sleep(Duration::from_millis(20));
//!     tx.send("done".to_string()).unwrap();
//! });
//!
//! let mut got = String::new();
//! eventually(&channel)
//!     .within(Duration::from_secs(2))
//!     .to(receive_into(&mut got));
//! assert_eq!(got, "done");
//! ```

use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use super::evaluate;
use super::matcher::Matcher;
use crate::error::{Error, Result};
use crate::format::Inspect;

/// Timing of a polling assertion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollConfig {
    /// How long to keep polling before giving up.
    pub timeout: Duration,
    /// Pause between attempts.
    pub interval: Duration,
}

impl PollConfig {
    /// Default deadline.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);
    /// Default pause between attempts.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(10);
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            timeout: Self::DEFAULT_TIMEOUT,
            interval: Self::DEFAULT_INTERVAL,
        }
    }
}

/// Start a polling assertion on `actual`.
pub fn eventually<T: Inspect>(actual: T) -> Eventually<T> {
    Eventually {
        actual,
        config: PollConfig::default(),
    }
}

/// Polling assertion builder created by [`eventually`].
#[derive(Debug)]
#[must_use = "a polling assertion does nothing until `to` or `to_not` is called"]
pub struct Eventually<T> {
    actual: T,
    config: PollConfig,
}

impl<T: Inspect> Eventually<T> {
    /// Set the deadline.
    pub fn within(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the pause between attempts.
    pub fn poll_every(mut self, interval: Duration) -> Self {
        self.config.interval = interval;
        self
    }

    /// Replace the whole polling configuration.
    pub fn with_config(mut self, config: PollConfig) -> Self {
        self.config = config;
        self
    }

    /// Current polling configuration.
    pub fn config(&self) -> PollConfig {
        self.config
    }

    /// Poll until `matcher` matches.
    ///
    /// # Panics
    ///
    /// Panics with the last failure message when the deadline passes, or
    /// with the error text when the matcher cannot evaluate the subject.
    #[track_caller]
    pub fn to(&self, matcher: impl Matcher) {
        if let Err(error) = self.try_to(matcher) {
            panic!("{error}");
        }
    }

    /// Poll until `matcher` stops matching.
    ///
    /// # Panics
    ///
    /// Same as [`to`](Self::to).
    #[track_caller]
    pub fn to_not(&self, matcher: impl Matcher) {
        if let Err(error) = self.try_to_not(matcher) {
            panic!("{error}");
        }
    }

    /// Poll until `matcher` matches.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Timeout`] carrying the last failure message when the
    /// deadline passes; any usage error from the matcher is returned as soon
    /// as it occurs.
    pub fn try_to(&self, mut matcher: impl Matcher) -> Result<()> {
        self.poll(&mut matcher, true)
    }

    /// Poll until `matcher` stops matching.
    ///
    /// # Errors
    ///
    /// Same as [`try_to`](Self::try_to).
    pub fn try_to_not(&self, mut matcher: impl Matcher) -> Result<()> {
        self.poll(&mut matcher, false)
    }

    fn poll(&self, matcher: &mut dyn Matcher, expect_match: bool) -> Result<()> {
        let start = Instant::now();
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            let message = match evaluate(&self.actual.inspect(), matcher, expect_match) {
                Ok(()) => return Ok(()),
                Err(Error::AssertionFailed(message)) => message,
                Err(error) => return Err(error),
            };

            let elapsed = start.elapsed();
            debug!(attempt, ?elapsed, "poll attempt did not succeed");

            if elapsed >= self.config.timeout {
                debug!(attempt, timeout = ?self.config.timeout, "polling deadline passed");
                return Err(Error::Timeout { elapsed, message });
            }
            thread::sleep(self.config.interval.min(self.config.timeout - elapsed));
        }
    }
}
