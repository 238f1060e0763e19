//! # matchkit 🎯
//!
//! > Readable assertions and failure messages for Rust values
//!
//! **matchkit** turns any value into an inspectable [`Value`](format::Value)
//! tree, checks it against composable matchers, and explains a failed check
//! with an indented, type-annotated rendering of the value.
//!
//! ## Quick Start
//!
//! ```rust
//! use matchkit::prelude::*;
//!
//! let channel = Channel::<i32>::bounded(1);
//! expect(&channel).to_not(receive());
//!
//! channel.send(17).unwrap();
//! let mut value = 0;
//! expect(&channel).to(receive_into(&mut value));
//! expect(value).to(equal(17));
//! ```
//!
//! A failed assertion panics with a message such as:
//!
//! ```text
//! Expected
//!     <Vec<i32> | len:3, cap:3>: [1, 2, 3]
//! to equal
//!     <Vec<i32> | len:2, cap:2>: [1, 2]
//! ```
//!
//! ## Features
//!
//! - 🔍 **Value inspection** - [`Inspect`] for std types, `#[derive(Inspect)]` for your own
//! - 🖨️ **Formatter** - type headers, long-form layout past a length threshold
//! - ✅ **Matchers** - booleans, nil, structural equality, channel receive
//! - 📬 **Channels** - bounded/unbounded queues whose state matchers can observe
//! - ⏳ **Polling** - [`eventually`] retries a matcher until a deadline

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Lets `#[derive(Inspect)]` output name `::matchkit` from inside this crate.
extern crate self as matchkit;

pub mod assertions;
pub mod error;
pub mod format;
pub mod queue;

/// Prelude for convenient imports
///
/// ```rust
/// use matchkit::prelude::*;
/// ```
pub mod prelude {
    pub use crate::assertions::matcher::{be_false, be_nil, be_true, equal, Matcher};
    pub use crate::assertions::receive::{receive, receive_into};
    pub use crate::assertions::{eventually, expect, PollConfig};
    pub use crate::error::{Error, Result};
    pub use crate::format::{Inspect, Value};
    pub use crate::queue::{Channel, Receiver, Sender};
}

// Re-exports
pub use assertions::{eventually, expect};
pub use error::{Error, Result};
pub use format::Inspect;

// Re-export the derive macro when the derive feature is enabled
#[cfg(feature = "derive")]
pub use matchkit_macros::Inspect;
