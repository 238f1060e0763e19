//! Dynamic value model consumed by the formatter and the matchers.

use std::borrow::Cow;
use std::fmt;

use crate::queue::QueueRef;

/// A runtime value whose shape is only known at run time.
///
/// Values are built from Rust data through [`Inspect`](super::Inspect) and
/// carry their (shortened) type name next to a structural [`Kind`].
///
/// Building a `Value` walks the whole data structure eagerly. A reference
/// cycle (for example an `Rc<RefCell<_>>` pointing back at an ancestor)
/// recurses until the stack is exhausted; nothing guards against it.
#[derive(Clone, Debug, PartialEq)]
pub struct Value {
    type_name: Option<Cow<'static, str>>,
    kind: Kind,
}

/// Structural kind of a [`Value`].
#[derive(Clone, Debug)]
pub enum Kind {
    /// Absence of a value: the literal nil or an unallocated reference.
    Nil,
    /// Boolean scalar.
    Bool(bool),
    /// Integer or floating scalar.
    Number(Number),
    /// Raw address (raw pointers).
    Address(usize),
    /// UTF-8 text.
    Str(String),
    /// Byte sequence, rendered like text.
    Bytes {
        /// The bytes.
        bytes: Vec<u8>,
        /// Storage of the sequence.
        extent: Extent,
    },
    /// Ordered sequence of values.
    Slice {
        /// Elements in order.
        elements: Vec<Value>,
        /// Storage of the sequence.
        extent: Extent,
    },
    /// Key/value entries in iteration order.
    Map(Vec<(Value, Value)>),
    /// Named fields in declaration order.
    Record(Vec<Field>),
    /// Owning or shared pointer to a single referent.
    Ref {
        /// Address of the referent.
        address: usize,
        /// The pointed-to value.
        referent: Box<Value>,
    },
    /// Function pointer.
    Func(usize),
    /// Live handle on a channel.
    Queue(QueueRef),
    /// Anything else, kept as its `Debug` text.
    Opaque(String),
}

/// How a sequence is stored. Decides what its type header reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Extent {
    /// Fixed-size array; the length is part of the type.
    Fixed,
    /// Borrowed slice; the header reports the length.
    Borrowed,
    /// Growable buffer; the header reports length and capacity.
    Growable {
        /// Allocated capacity.
        capacity: usize,
    },
}

/// Numeric scalar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    /// Signed integer of any width.
    Int(i128),
    /// Unsigned integer of any width.
    Uint(u128),
    /// Single precision float.
    F32(f32),
    /// Double precision float.
    F64(f64),
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Uint(n) => write!(f, "{n}"),
            Self::F32(n) => write!(f, "{n}"),
            Self::F64(n) => write!(f, "{n}"),
        }
    }
}

/// Visibility of a record field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// `pub`: part of the type's public contract.
    Public,
    /// `pub(crate)`, `pub(super)` or `pub(in path)`.
    Restricted,
    /// No visibility modifier.
    Private,
}

impl Visibility {
    /// Whether the field is visible to every consumer of the type.
    #[must_use]
    pub fn is_public(self) -> bool {
        self == Self::Public
    }
}

/// A named field of a record.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    /// Field name; positional fields use their index.
    pub name: Cow<'static, str>,
    /// Declared visibility.
    pub visibility: Visibility,
    /// Field value.
    pub value: Value,
}

impl Value {
    /// The literal absence of a value. Its type header renders as `nil`.
    #[must_use]
    pub const fn nil() -> Self {
        Self {
            type_name: None,
            kind: Kind::Nil,
        }
    }

    /// Create a value with an explicit type name.
    pub fn new(type_name: impl Into<Cow<'static, str>>, kind: Kind) -> Self {
        Self {
            type_name: Some(type_name.into()),
            kind,
        }
    }

    /// Create a value whose type name is taken from `T`.
    #[must_use]
    pub fn of<T: ?Sized>(kind: Kind) -> Self {
        Self::new(short_type_name(std::any::type_name::<T>()), kind)
    }

    /// Start building a record value for `T`.
    ///
    /// ```rust
    /// use matchkit::format::{object, Value, Visibility};
    ///
    /// struct Point { x: i32, y: i32 }
    ///
    /// let p = Point { x: 1, y: 2 };
    /// let value = Value::record::<Point>()
    ///     .field("x", Visibility::Public, &p.x)
    ///     .field("y", Visibility::Private, &p.y)
    ///     .finish();
    /// assert_eq!(object(&value, 0), "<Point>: {x: 1}");
    /// ```
    #[must_use]
    pub fn record<T: ?Sized>() -> RecordBuilder {
        RecordBuilder {
            type_name: short_type_name(std::any::type_name::<T>()),
            fields: Vec::new(),
        }
    }

    /// Type name, or `None` for the literal nil.
    #[must_use]
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    /// Structural kind.
    #[must_use]
    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    /// Whether the value is nil.
    #[must_use]
    pub fn is_nil(&self) -> bool {
        matches!(self.kind, Kind::Nil)
    }
}

/// Builder returned by [`Value::record`].
#[derive(Debug)]
pub struct RecordBuilder {
    type_name: String,
    fields: Vec<Field>,
}

impl RecordBuilder {
    /// Append a field.
    #[must_use]
    pub fn field<V: super::Inspect + ?Sized>(
        mut self,
        name: impl Into<Cow<'static, str>>,
        visibility: Visibility,
        value: &V,
    ) -> Self {
        self.fields.push(Field {
            name: name.into(),
            visibility,
            value: value.inspect(),
        });
        self
    }

    /// Finish the record.
    #[must_use]
    pub fn finish(self) -> Value {
        Value::new(self.type_name, Kind::Record(self.fields))
    }
}

impl PartialEq for Kind {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Nil, Self::Nil) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::Address(a), Self::Address(b)) | (Self::Func(a), Self::Func(b)) => a == b,
            (Self::Str(a), Self::Str(b)) | (Self::Opaque(a), Self::Opaque(b)) => a == b,
            (Self::Bytes { bytes: a, .. }, Self::Bytes { bytes: b, .. }) => a == b,
            (Self::Slice { elements: a, .. }, Self::Slice { elements: b, .. }) => a == b,
            (Self::Map(a), Self::Map(b)) => {
                a.len() == b.len() && a.iter().all(|entry| b.contains(entry))
            }
            (Self::Record(a), Self::Record(b)) => a == b,
            (Self::Ref { referent: a, .. }, Self::Ref { referent: b, .. }) => a == b,
            (Self::Queue(a), Self::Queue(b)) => a == b,
            _ => false,
        }
    }
}

/// Strip module paths from a type name: `alloc::vec::Vec<i32>` becomes `Vec<i32>`.
pub(crate) fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment_start = 0;
    let mut chars = full.chars().peekable();
    while let Some(c) = chars.next() {
        if c == ':' && chars.peek() == Some(&':') {
            chars.next();
            out.truncate(segment_start);
            continue;
        }
        out.push(c);
        if !(c.is_alphanumeric() || c == '_') {
            segment_start = out.len();
        }
    }
    out
}
