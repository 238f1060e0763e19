//! Structural formatting of runtime values for failure messages.
//!
//! This module turns any [`Value`] into an indented, type-annotated string:
//!
//! - [`object`] - `<type header>: body` at a given indentation
//! - [`message`] - the full "Expected ... to ..." diagnostic
//! - [`Inspect`] - conversion of Rust data into [`Value`]s
//! - [`Formatter`] - the same operations with a custom indent or threshold
//!
//! # Example
//!
//! ```rust
//! use matchkit::format::{message, Inspect};
//!
//! let text = message(&vec![1, 2].inspect(), "to be empty", None);
//! assert!(text.starts_with("Expected\n    <Vec<i32> | len:2, cap:"));
//! assert!(text.ends_with(">: [1, 2]\nto be empty"));
//! ```
//!
//! Strings render unquoted at indentation 1 (the top-level subject of an
//! assertion) with continuation lines indented once; anywhere else they are
//! quoted and escaped. Sequences, maps and records switch to one entry per
//! line once any rendered entry exceeds the long-form threshold.

mod inspect;
mod value;

pub use inspect::{Debugged, Inspect};
pub use value::{Extent, Field, Kind, Number, RecordBuilder, Value, Visibility};

pub(crate) use value::short_type_name;

/// Indent unit used by the default formatter.
pub const DEFAULT_INDENT: &str = "    ";

/// Entry length above which collections use the multi-line form.
pub const LONG_FORM_THRESHOLD: usize = 20;

const DEFAULT_FORMATTER: Formatter = Formatter::new();

/// Value formatter.
///
/// Stateless: output depends only on the value, the indentation and the two
/// settings below.
///
/// # Example
///
/// ```rust
/// use matchkit::format::{Formatter, Inspect};
///
/// let formatter = Formatter::new().with_indent("  ").with_long_form_threshold(2);
/// assert_eq!(
///     formatter.format_value(&["abc", "d"].inspect(), 1),
///     "[\n    \"abc\",\n    \"d\",\n  ]"
/// );
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Formatter {
    indent: &'static str,
    long_form_threshold: usize,
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter {
    /// Create a formatter with four-space indentation and a threshold of 20.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            indent: DEFAULT_INDENT,
            long_form_threshold: LONG_FORM_THRESHOLD,
        }
    }

    /// Use a different indent unit.
    #[must_use]
    pub const fn with_indent(mut self, indent: &'static str) -> Self {
        self.indent = indent;
        self
    }

    /// Use a different long-form threshold.
    #[must_use]
    pub const fn with_long_form_threshold(mut self, threshold: usize) -> Self {
        self.long_form_threshold = threshold;
        self
    }

    /// The indent unit.
    #[must_use]
    pub const fn indent(&self) -> &'static str {
        self.indent
    }

    /// The long-form threshold.
    #[must_use]
    pub const fn long_form_threshold(&self) -> usize {
        self.long_form_threshold
    }

    /// Compose a failure message: the actual value, the text, and the
    /// expected value when there is one, each on its own block.
    #[must_use]
    pub fn message(&self, actual: &Value, text: &str, expected: Option<&Value>) -> String {
        let mut out = format!("Expected\n{}\n{text}", self.object(actual, 1));
        if let Some(expected) = expected {
            out.push('\n');
            out.push_str(&self.object(expected, 1));
        }
        out
    }

    /// Render `value` with its indentation prefix and type header.
    #[must_use]
    pub fn object(&self, value: &Value, indentation: usize) -> String {
        format!(
            "{}<{}>: {}",
            self.indent.repeat(indentation),
            format_type(value),
            self.format_value(value, indentation)
        )
    }

    /// Prefix every line of `s` with `indentation` indent units.
    #[must_use]
    pub fn indent_string(&self, s: &str, indentation: usize) -> String {
        let indent = self.indent.repeat(indentation);
        s.split('\n')
            .map(|line| format!("{indent}{line}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Render the body of `value`, without the type header.
    #[must_use]
    pub fn format_value(&self, value: &Value, indentation: usize) -> String {
        match value.kind() {
            Kind::Nil => "nil".to_string(),
            Kind::Bool(b) => b.to_string(),
            Kind::Number(n) => n.to_string(),
            Kind::Address(address) | Kind::Func(address) => format!("{address:#x}"),
            Kind::Queue(queue) => format!("{:#x}", queue.address()),
            // The header already shows the pointer; the body shows the pointee.
            Kind::Ref { referent, .. } => self.format_value(referent, indentation),
            Kind::Str(s) => self.format_string(s, indentation),
            Kind::Bytes { bytes, .. } => {
                self.format_string(&String::from_utf8_lossy(bytes), indentation)
            }
            Kind::Slice { elements, .. } => {
                let entries = elements
                    .iter()
                    .map(|element| self.format_value(element, indentation + 1))
                    .collect();
                self.layout(('[', ']'), entries, indentation)
            }
            Kind::Map(entries) => {
                let entries = entries
                    .iter()
                    .map(|(key, value)| {
                        format!(
                            "{}: {}",
                            self.format_value(key, 0),
                            self.format_value(value, indentation + 1)
                        )
                    })
                    .collect();
                self.layout(('{', '}'), entries, indentation)
            }
            Kind::Record(fields) => {
                let entries = fields
                    .iter()
                    .filter(|field| field.visibility.is_public())
                    .map(|field| {
                        format!(
                            "{}: {}",
                            field.name,
                            self.format_value(&field.value, indentation + 1)
                        )
                    })
                    .collect();
                self.layout(('{', '}'), entries, indentation)
            }
            Kind::Opaque(text) => text.clone(),
        }
    }

    fn format_string(&self, s: &str, indentation: usize) -> String {
        if indentation == 1 {
            s.split('\n')
                .collect::<Vec<_>>()
                .join(&format!("\n{}", self.indent))
        } else {
            format!("{s:?}")
        }
    }

    fn layout(&self, (open, close): (char, char), entries: Vec<String>, indentation: usize) -> String {
        let longest = entries
            .iter()
            .map(|entry| entry.chars().count())
            .max()
            .unwrap_or(0);

        if longest > self.long_form_threshold {
            let outer = self.indent.repeat(indentation);
            let inner = format!("{outer}{}", self.indent);
            let separator = format!(",\n{inner}");
            format!("{open}\n{inner}{},\n{outer}{close}", entries.join(&separator))
        } else {
            format!("{open}{}{close}", entries.join(", "))
        }
    }
}

/// Render the type header of `value`: the type name plus length, capacity or
/// address metadata for collections, queues and references.
#[must_use]
pub fn format_type(value: &Value) -> String {
    let Some(name) = value.type_name() else {
        return "nil".to_string();
    };
    match value.kind() {
        Kind::Slice { elements, extent } => sequence_header(name, elements.len(), *extent),
        Kind::Bytes { bytes, extent } => sequence_header(name, bytes.len(), *extent),
        Kind::Queue(queue) => match queue.capacity() {
            Some(capacity) => format!("{name} | len:{}, cap:{capacity}", queue.len()),
            None => format!("{name} | len:{}, cap:unbounded", queue.len()),
        },
        Kind::Ref { address, .. } => format!("{name} | {address:#x}"),
        Kind::Map(entries) => format!("{name} | len:{}", entries.len()),
        _ => name.to_string(),
    }
}

fn sequence_header(name: &str, len: usize, extent: Extent) -> String {
    match extent {
        Extent::Fixed => name.to_string(),
        Extent::Borrowed => format!("{name} | len:{len}"),
        Extent::Growable { capacity } => format!("{name} | len:{len}, cap:{capacity}"),
    }
}

/// [`Formatter::message`] with the default formatter.
#[must_use]
pub fn message(actual: &Value, text: &str, expected: Option<&Value>) -> String {
    DEFAULT_FORMATTER.message(actual, text, expected)
}

/// [`Formatter::object`] with the default formatter.
#[must_use]
pub fn object(value: &Value, indentation: usize) -> String {
    DEFAULT_FORMATTER.object(value, indentation)
}

/// [`Formatter::format_value`] with the default formatter.
#[must_use]
pub fn format_value(value: &Value, indentation: usize) -> String {
    DEFAULT_FORMATTER.format_value(value, indentation)
}

/// [`Formatter::indent_string`] with the default formatter.
#[must_use]
pub fn indent_string(s: &str, indentation: usize) -> String {
    DEFAULT_FORMATTER.indent_string(s, indentation)
}
