//! Fluent assertions over inspected values.
//!
//! This module provides:
//!
//! - [`expect`] - one-shot assertion on a value
//! - [`eventually`](fn@eventually) - polling assertion that retries until a deadline
//! - [`assert_that!`](crate::assert_that) - macro form of [`expect`] with an optional description
//! - [`matcher`] - the [`Matcher`] protocol and the basic matchers
//! - [`receive`](mod@receive) - the channel receive matcher
//!
//! A matcher either matches, does not match, or cannot evaluate its subject
//! at all. The last case is a usage error: it is reported verbatim, whether
//! or not the assertion was negated.
//!
//! # Example
//!
//! ```rust
//! use matchkit::assertions::matcher::{be_false, equal};
//! use matchkit::{assert_that, expect};
//!
//! expect(false).to(be_false());
//! expect(vec![1, 2, 3]).to_not(equal(vec![3, 2, 1]));
//! assert_that!(String::from("abc"), equal("abc".to_string()), "checking {}", "strings");
//! ```

pub mod eventually;
pub mod matcher;
pub mod receive;

pub use eventually::{eventually, Eventually, PollConfig};
pub use matcher::Matcher;

use crate::error::{Error, Result};
use crate::format::{Inspect, Value};

/// Start a one-shot assertion on `actual`.
///
/// `actual` is inspected once, up front.
pub fn expect<T: Inspect>(actual: T) -> Assertion {
    Assertion {
        actual: actual.inspect(),
    }
}

/// One-shot assertion created by [`expect`].
#[derive(Clone, Debug)]
#[must_use = "an assertion does nothing until `to` or `to_not` is called"]
pub struct Assertion {
    actual: Value,
}

impl Assertion {
    /// The inspected subject.
    pub fn value(&self) -> &Value {
        &self.actual
    }

    /// Assert that `matcher` matches.
    ///
    /// # Panics
    ///
    /// Panics with the failure message, or with the error text when the
    /// matcher cannot evaluate the subject.
    #[track_caller]
    pub fn to(&self, matcher: impl Matcher) {
        if let Err(error) = self.try_to(matcher) {
            panic!("{error}");
        }
    }

    /// Assert that `matcher` does not match.
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

    /// Assert that `matcher` matches.
    ///
    /// # Errors
    ///
    /// [`Error::AssertionFailed`] with the failure message on a mismatch, or
    /// the matcher's own error.
    pub fn try_to(&self, mut matcher: impl Matcher) -> Result<()> {
        evaluate(&self.actual, &mut matcher, true)
    }

    /// Assert that `matcher` does not match.
    ///
    /// # Errors
    ///
    /// [`Error::AssertionFailed`] with the negated failure message on a
    /// match, or the matcher's own error.
    pub fn try_to_not(&self, mut matcher: impl Matcher) -> Result<()> {
        evaluate(&self.actual, &mut matcher, false)
    }
}

/// Run `matcher` once and turn a wrong outcome into [`Error::AssertionFailed`].
pub(crate) fn evaluate(actual: &Value, matcher: &mut dyn Matcher, expect_match: bool) -> Result<()> {
    let matched = matcher.matches(actual)?;
    match (matched, expect_match) {
        (true, true) | (false, false) => Ok(()),
        (false, true) => Err(Error::AssertionFailed(matcher.failure_message(actual))),
        (true, false) => Err(Error::AssertionFailed(
            matcher.negated_failure_message(actual),
        )),
    }
}

/// Assert that a value satisfies a matcher.
///
/// The value is borrowed, not moved. An optional trailing format string is
/// placed above the failure message.
///
/// # Panics
///
/// Panics when the matcher does not match or cannot evaluate the value.
///
/// # Example
///
/// ```rust
/// use matchkit::assert_that;
/// use matchkit::assertions::matcher::{be_nil, equal};
///
/// let name: Option<&str> = None;
/// assert_that!(name, be_nil());
/// assert_that!(42u8, equal(42u8), "answer for {}", "everything");
/// ```
///
/// ```rust,should_panic
/// use matchkit::assert_that;
/// use matchkit::assertions::matcher::be_true;
///
/// assert_that!(false, be_true(), "flag must be set");
/// ```
#[macro_export]
macro_rules! assert_that {
    ($actual:expr, $matcher:expr $(,)?) => {
        $crate::assertions::expect(&$actual).to($matcher)
    };
    ($actual:expr, $matcher:expr, $($arg:tt)+) => {{
        if let ::core::result::Result::Err(error) =
            $crate::assertions::expect(&$actual).try_to($matcher)
        {
            ::core::panic!("{}\n{}", ::core::format_args!($($arg)+), error);
        }
    }};
}
