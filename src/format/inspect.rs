//! Conversion of Rust data into [`Value`]s.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Debug;
use std::hash::BuildHasher;
use std::rc::Rc;
use std::sync::Arc;

use super::value::{short_type_name, Extent, Kind, Number, Value};

/// Types that can describe themselves as a dynamic [`Value`].
///
/// Structs get an implementation from `#[derive(Inspect)]`, which records the
/// declared visibility of every field. Types without a structural rendering
/// can be wrapped in [`Debugged`].
///
/// # Implementing by hand
///
/// ```rust
/// use matchkit::format::{object, Inspect, Value, Visibility};
///
/// struct Temperature {
///     celsius: f64,
/// }
///
/// impl Inspect for Temperature {
///     fn inspect(&self) -> Value {
///         Value::record::<Self>()
///             .field("celsius", Visibility::Public, &self.celsius)
///             .finish()
///     }
/// }
///
/// let t = Temperature { celsius: 21.5 };
/// assert_eq!(object(&t.inspect(), 0), "<Temperature>: {celsius: 21.5}");
/// ```
pub trait Inspect {
    /// Describe `self` as a [`Value`].
    fn inspect(&self) -> Value;

    /// Reinterpret a slice of `Self` as bytes, if `Self` is `u8`.
    #[doc(hidden)]
    fn byte_slice(items: &[Self]) -> Option<&[u8]>
    where
        Self: Sized,
    {
        let _ = items;
        None
    }
}

/// Wrapper that inspects any `Debug` type through its `Debug` text.
///
/// ```rust
/// use matchkit::format::{object, Debugged, Inspect};
///
/// #[derive(Debug)]
/// enum Color { Red }
///
/// assert_eq!(object(&Debugged(Color::Red).inspect(), 0), "<Color>: Red");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Debugged<T>(pub T);

impl<T: Debug> Inspect for Debugged<T> {
    fn inspect(&self) -> Value {
        Value::new(
            referent_type_name(std::any::type_name::<T>()),
            Kind::Opaque(format!("{:?}", self.0)),
        )
    }
}

/// Short type name with leading borrows removed: `&mut Duration` is `Duration`.
fn referent_type_name(full: &str) -> String {
    let mut name = full;
    while let Some(rest) = name.strip_prefix('&') {
        name = rest.strip_prefix("mut ").unwrap_or(rest);
    }
    short_type_name(name)
}

impl Inspect for Value {
    fn inspect(&self) -> Value {
        self.clone()
    }
}

impl Inspect for bool {
    fn inspect(&self) -> Value {
        Value::of::<Self>(Kind::Bool(*self))
    }
}

macro_rules! inspect_number {
    ($variant:ident => $($ty:ty),+) => {
        $(
            impl Inspect for $ty {
                fn inspect(&self) -> Value {
                    Value::of::<Self>(Kind::Number(Number::$variant((*self).into())))
                }
            }
        )+
    };
}

inspect_number!(Int => i8, i16, i32, i64, i128);
inspect_number!(Uint => u16, u32, u64, u128);
inspect_number!(F32 => f32);
inspect_number!(F64 => f64);

impl Inspect for u8 {
    fn inspect(&self) -> Value {
        Value::of::<Self>(Kind::Number(Number::Uint((*self).into())))
    }

    fn byte_slice(items: &[Self]) -> Option<&[u8]> {
        Some(items)
    }
}

impl Inspect for isize {
    fn inspect(&self) -> Value {
        // isize is at most 64 bits wide on every supported target.
        Value::of::<Self>(Kind::Number(Number::Int(*self as i128)))
    }
}

impl Inspect for usize {
    fn inspect(&self) -> Value {
        Value::of::<Self>(Kind::Number(Number::Uint(*self as u128)))
    }
}

impl Inspect for char {
    fn inspect(&self) -> Value {
        Value::of::<Self>(Kind::Opaque(format!("{self:?}")))
    }
}

impl Inspect for () {
    fn inspect(&self) -> Value {
        Value::of::<Self>(Kind::Opaque("()".to_string()))
    }
}

impl Inspect for str {
    fn inspect(&self) -> Value {
        Value::of::<&str>(Kind::Str(self.to_string()))
    }
}

impl Inspect for String {
    fn inspect(&self) -> Value {
        Value::of::<Self>(Kind::Str(self.clone()))
    }
}

/// `u8` sequences become [`Kind::Bytes`], everything else [`Kind::Slice`].
fn sequence<T: Inspect>(items: &[T], extent: Extent) -> Kind {
    match T::byte_slice(items) {
        Some(bytes) => Kind::Bytes {
            bytes: bytes.to_vec(),
            extent,
        },
        None => Kind::Slice {
            elements: items.iter().map(Inspect::inspect).collect(),
            extent,
        },
    }
}

impl<T: Inspect> Inspect for [T] {
    fn inspect(&self) -> Value {
        Value::of::<&[T]>(sequence(self, Extent::Borrowed))
    }
}

impl<T: Inspect, const N: usize> Inspect for [T; N] {
    fn inspect(&self) -> Value {
        Value::of::<Self>(sequence(self, Extent::Fixed))
    }
}

impl<T: Inspect> Inspect for Vec<T> {
    fn inspect(&self) -> Value {
        let extent = Extent::Growable {
            capacity: self.capacity(),
        };
        Value::of::<Self>(sequence(self, extent))
    }
}

impl<K: Inspect, V: Inspect, S: BuildHasher> Inspect for HashMap<K, V, S> {
    fn inspect(&self) -> Value {
        let entries = self.iter().map(|(k, v)| (k.inspect(), v.inspect())).collect();
        Value::of::<HashMap<K, V>>(Kind::Map(entries))
    }
}

impl<K: Inspect, V: Inspect> Inspect for BTreeMap<K, V> {
    fn inspect(&self) -> Value {
        let entries = self.iter().map(|(k, v)| (k.inspect(), v.inspect())).collect();
        Value::of::<Self>(Kind::Map(entries))
    }
}

fn reference<P: ?Sized, T: Inspect + ?Sized>(target: &T) -> Value {
    Value::of::<P>(Kind::Ref {
        address: std::ptr::from_ref(target).cast::<()>() as usize,
        referent: Box::new(target.inspect()),
    })
}

impl<T: Inspect + ?Sized> Inspect for Box<T> {
    fn inspect(&self) -> Value {
        reference::<Self, T>(self)
    }
}

impl<T: Inspect + ?Sized> Inspect for Rc<T> {
    fn inspect(&self) -> Value {
        reference::<Self, T>(self)
    }
}

impl<T: Inspect + ?Sized> Inspect for Arc<T> {
    fn inspect(&self) -> Value {
        reference::<Self, T>(self)
    }
}

impl<T: Inspect + ?Sized> Inspect for &T {
    fn inspect(&self) -> Value {
        (**self).inspect()
    }
}

impl<T: Inspect + ?Sized> Inspect for &mut T {
    fn inspect(&self) -> Value {
        (**self).inspect()
    }
}

impl<T: Inspect> Inspect for Option<T> {
    fn inspect(&self) -> Value {
        match self {
            Some(value) => value.inspect(),
            None => Value::of::<Self>(Kind::Nil),
        }
    }
}

impl<T: ?Sized> Inspect for *const T {
    fn inspect(&self) -> Value {
        Value::of::<Self>(Kind::Address(self.cast::<()>() as usize))
    }
}

impl<T: ?Sized> Inspect for *mut T {
    fn inspect(&self) -> Value {
        Value::of::<Self>(Kind::Address(self.cast::<()>() as usize))
    }
}

macro_rules! inspect_fn {
    ($($arg:ident),*) => {
        impl<R, $($arg),*> Inspect for fn($($arg),*) -> R {
            fn inspect(&self) -> Value {
                Value::of::<Self>(Kind::Func(*self as usize))
            }
        }
    };
}

inspect_fn!();
inspect_fn!(A);
inspect_fn!(A, B);
inspect_fn!(A, B, C);
