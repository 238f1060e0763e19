// Allow must_use_candidate for matcher factory functions since returning the matcher
// without using it is the common pattern for test setup
#![allow(clippy::must_use_candidate)]

//! Matcher protocol and the basic matchers.
//!
//! This module provides:
//!
//! - [`Matcher`] trait for custom matchers
//! - Built-in matchers: [`be_true`], [`be_false`], [`be_nil`], [`equal`]
//! - The channel matcher lives in [`receive`](super::receive)
//!
//! # Example
//!
//! ```rust
//! use matchkit::assertions::matcher::{be_true, equal, Matcher};
//! use matchkit::format::Inspect;
//!
//! let mut m = be_true();
//! assert_eq!(m.matches(&true.inspect()), Ok(true));
//! assert_eq!(m.matches(&false.inspect()), Ok(false));
//! assert!(m.matches(&"foo".inspect()).is_err());
//!
//! let mut m = equal(42);
//! assert_eq!(m.matches(&42i32.inspect()), Ok(true));
//! ```

use crate::error::{Error, Result};
use crate::format::{message, object, Inspect, Kind, Value};

/// A predicate plus the diagnostics that explain its outcome.
///
/// `matches` has three outcomes:
///
/// - `Ok(true)` - the value matched
/// - `Ok(false)` - the value did not match; the caller reports
///   [`failure_message`](Matcher::failure_message), or
///   [`negated_failure_message`](Matcher::negated_failure_message) when the
///   assertion was negative and the value did match
/// - `Err(_)` - the match could not be evaluated at all; the error is
///   reported as-is whether or not the assertion was negated
///
/// `matches` takes `&mut self` because a matcher may write what it observed
/// into a destination (see [`receive_into`](super::receive::receive_into)).
///
/// # Implementing Custom Matchers
///
/// ```rust
/// use matchkit::assertions::matcher::Matcher;
/// use matchkit::error::{Error, Result};
/// use matchkit::format::{message, object, Inspect, Kind, Number, Value};
///
/// struct BeEven;
///
/// impl Matcher for BeEven {
///     fn matches(&mut self, actual: &Value) -> Result<bool> {
///         match actual.kind() {
///             Kind::Number(Number::Int(n)) => Ok(n % 2 == 0),
///             Kind::Number(Number::Uint(n)) => Ok(n % 2 == 0),
///             _ => Err(Error::unexpected_type("BeEven", "an integer", object(actual, 1))),
///         }
///     }
///
///     fn failure_message(&self, actual: &Value) -> String {
///         message(actual, "to be even", None)
///     }
///
///     fn negated_failure_message(&self, actual: &Value) -> String {
///         message(actual, "not to be even", None)
///     }
/// }
///
/// let mut m = BeEven;
/// assert_eq!(m.matches(&4i32.inspect()), Ok(true));
/// assert_eq!(m.matches(&3i32.inspect()), Ok(false));
/// ```
pub trait Matcher {
    /// Evaluate the matcher against `actual`.
    ///
    /// # Errors
    ///
    /// Returns an error when `actual` (or the matcher's own arguments) have a
    /// shape the matcher cannot evaluate.
    fn matches(&mut self, actual: &Value) -> Result<bool>;

    /// Explain why `actual` did not match.
    fn failure_message(&self, actual: &Value) -> String;

    /// Explain why `actual` matched when it should not have.
    fn negated_failure_message(&self, actual: &Value) -> String;
}

// Implement Matcher for Box<dyn Matcher> to allow heterogeneous collections
impl<M: Matcher + ?Sized> Matcher for Box<M> {
    fn matches(&mut self, actual: &Value) -> Result<bool> {
        (**self).matches(actual)
    }

    fn failure_message(&self, actual: &Value) -> String {
        (**self).failure_message(actual)
    }

    fn negated_failure_message(&self, actual: &Value) -> String {
        (**self).negated_failure_message(actual)
    }
}

impl<M: Matcher + ?Sized> Matcher for &mut M {
    fn matches(&mut self, actual: &Value) -> Result<bool> {
        (**self).matches(actual)
    }

    fn failure_message(&self, actual: &Value) -> String {
        (**self).failure_message(actual)
    }

    fn negated_failure_message(&self, actual: &Value) -> String {
        (**self).negated_failure_message(actual)
    }
}

// =============================================================================
// Built-in Matchers
// =============================================================================

/// Create a matcher that succeeds for `true`.
///
/// # Example
///
/// ```rust
/// use matchkit::assertions::matcher::{be_true, Matcher};
/// use matchkit::format::Inspect;
///
/// let mut m = be_true();
/// assert_eq!(m.matches(&true.inspect()), Ok(true));
/// assert_eq!(m.matches(&false.inspect()), Ok(false));
/// ```
pub fn be_true() -> BoolMatcher {
    BoolMatcher { expected: true }
}

/// Create a matcher that succeeds for `false`.
pub fn be_false() -> BoolMatcher {
    BoolMatcher { expected: false }
}

/// Matcher for boolean values.
///
/// Non-boolean values are a usage error, not a non-match.
#[derive(Clone, Copy, Debug)]
pub struct BoolMatcher {
    expected: bool,
}

impl Matcher for BoolMatcher {
    fn matches(&mut self, actual: &Value) -> Result<bool> {
        match actual.kind() {
            Kind::Bool(value) => Ok(*value == self.expected),
            _ => Err(Error::unexpected_type(
                if self.expected { "BeTrue" } else { "BeFalse" },
                "a bool",
                object(actual, 1),
            )),
        }
    }

    fn failure_message(&self, actual: &Value) -> String {
        message(actual, &format!("to be {}", self.expected), None)
    }

    fn negated_failure_message(&self, actual: &Value) -> String {
        message(actual, &format!("not to be {}", self.expected), None)
    }
}

/// Create a matcher that succeeds for nil values.
///
/// # Example
///
/// ```rust
/// use matchkit::assertions::matcher::{be_nil, Matcher};
/// use matchkit::format::Inspect;
///
/// let none: Option<i32> = None;
/// assert_eq!(be_nil().matches(&Inspect::inspect(&none)), Ok(true));
/// assert_eq!(be_nil().matches(&Inspect::inspect(&Some(1))), Ok(false));
/// ```
pub fn be_nil() -> NilMatcher {
    NilMatcher
}

/// Matcher for nil values.
#[derive(Clone, Copy, Debug)]
pub struct NilMatcher;

impl Matcher for NilMatcher {
    fn matches(&mut self, actual: &Value) -> Result<bool> {
        Ok(actual.is_nil())
    }

    fn failure_message(&self, actual: &Value) -> String {
        message(actual, "to be nil", None)
    }

    fn negated_failure_message(&self, actual: &Value) -> String {
        message(actual, "not to be nil", None)
    }
}

/// Create a structural equality matcher.
///
/// Values are equal when their type names and structure agree; references
/// compare what they point to, maps ignore iteration order.
///
/// # Example
///
/// ```rust
/// use matchkit::assertions::matcher::{equal, Matcher};
/// use matchkit::format::Inspect;
///
/// let mut m = equal(vec![1, 2]);
/// assert_eq!(m.matches(&vec![1, 2].inspect()), Ok(true));
/// assert_eq!(m.matches(&vec![2, 1].inspect()), Ok(false));
/// ```
pub fn equal<T: Inspect>(expected: T) -> EqualMatcher {
    EqualMatcher {
        expected: expected.inspect(),
    }
}

/// Matcher for structural equality.
#[derive(Clone, Debug)]
pub struct EqualMatcher {
    expected: Value,
}

impl Matcher for EqualMatcher {
    fn matches(&mut self, actual: &Value) -> Result<bool> {
        if actual.is_nil() && self.expected.is_nil() {
            return Err(Error::NilComparison);
        }
        Ok(*actual == self.expected)
    }

    fn failure_message(&self, actual: &Value) -> String {
        message(actual, "to equal", Some(&self.expected))
    }

    fn negated_failure_message(&self, actual: &Value) -> String {
        message(actual, "not to equal", Some(&self.expected))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_be_true() {
        let mut m = be_true();
        assert_eq!(m.matches(&true.inspect()), Ok(true));
        assert_eq!(m.matches(&false.inspect()), Ok(false));
    }

    #[test]
    fn test_be_true_rejects_non_bool() {
        let err = be_true().matches(&"foo".inspect()).unwrap_err();
        assert_eq!(
            err,
            Error::UnexpectedType {
                matcher: "BeTrue",
                expected: "a bool",
                actual: "    <&str>: foo".to_string(),
            }
        );
    }

    #[test]
    fn test_be_false() {
        let mut m = be_false();
        assert_eq!(m.matches(&false.inspect()), Ok(true));
        assert_eq!(m.matches(&true.inspect()), Ok(false));
        assert!(m.matches(&0i32.inspect()).is_err());
    }

    #[test]
    fn test_bool_messages() {
        let m = be_true();
        assert_eq!(
            m.failure_message(&false.inspect()),
            "Expected\n    <bool>: false\nto be true"
        );
        assert_eq!(
            m.negated_failure_message(&true.inspect()),
            "Expected\n    <bool>: true\nnot to be true"
        );
    }

    #[test]
    fn test_be_nil() {
        let none: Option<String> = None;
        assert_eq!(be_nil().matches(&crate::format::Inspect::inspect(&none)), Ok(true));
        assert_eq!(be_nil().matches(&Value::nil()), Ok(true));
        assert_eq!(be_nil().matches(&"".inspect()), Ok(false));
    }

    #[test]
    fn test_equal() {
        let mut m = equal("hello");
        assert_eq!(m.matches(&"hello".inspect()), Ok(true));
        assert_eq!(m.matches(&"world".inspect()), Ok(false));
        // Different types never compare equal.
        assert_eq!(equal(1i32).matches(&1i64.inspect()), Ok(false));
        assert_eq!(equal(Box::new(3)).matches(&Box::new(3).inspect()), Ok(true));
    }

    #[test]
    fn test_equal_refuses_nil_nil() {
        let none: Option<i32> = None;
        assert_eq!(
            equal(Value::nil()).matches(&crate::format::Inspect::inspect(&none)),
            Err(Error::NilComparison)
        );
        assert_eq!(equal(Value::nil()).matches(&1i32.inspect()), Ok(false));
    }

    #[test]
    fn test_equal_messages_include_expected() {
        let m = equal(2);
        assert_eq!(
            m.failure_message(&1i32.inspect()),
            "Expected\n    <i32>: 1\nto equal\n    <i32>: 2"
        );
        assert!(m
            .negated_failure_message(&2i32.inspect())
            .contains("not to equal"));
    }

    #[test]
    fn test_boxed_matchers() {
        let mut matchers: Vec<Box<dyn Matcher>> = vec![Box::new(be_true()), Box::new(equal(true))];
        for m in &mut matchers {
            assert_eq!(m.matches(&true.inspect()), Ok(true));
        }
    }
}
