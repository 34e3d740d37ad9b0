//! Raw interpolated values.
//!
//! A [`Value`] is whatever a caller drops into a template slot. It is classified exactly
//! once, when it enters the pipeline: either by interpolation (which escapes scalars) or
//! in fragment position (inside a list, or as the result of a deferred value), where
//! only text, sequences and deferred values are accepted. See [`Fragment`] for both
//! rules.
//!
//! [`Fragment`]: crate::fragment::Fragment

use std::borrow::Cow;
use std::fmt;

use super::Template;
use crate::fragment::Deferred;

/// A value interpolated into a template slot.
pub enum Value {
    /// Text. Escaped when interpolated, emitted verbatim in fragment position.
    Text(Cow<'static, str>),
    /// Integer, stringified when interpolated.
    Int(i64),
    /// Floating point number, stringified when interpolated.
    Float(f64),
    /// Boolean, stringified when interpolated.
    Bool(bool),
    /// Ordered list whose elements are emitted in fragment position.
    List(Vec<Value>),
    /// One-shot lazy iterator whose items are emitted in fragment position.
    Iter(ValueIter),
    /// Nested template.
    Template(Template),
    /// Value that is not available yet.
    Deferred(Deferred),
}

impl Value {
    /// Build a lazily consumed sequence from any `Send` iterator.
    ///
    /// The iterator is pulled only while rendering, one item at a time, and only once.
    pub fn iter<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value> + 'static,
        I::IntoIter: Send + 'static,
    {
        Self::Iter(ValueIter::new(items))
    }

    /// Short name of the value's kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Int(_) | Self::Float(_) => "number",
            Self::Bool(_) => "boolean",
            Self::List(_) => "list",
            Self::Iter(_) => "iterator",
            Self::Template(_) => "template",
            Self::Deferred(_) => "deferred",
        }
    }

    /// Whether the value has the iterable capability (checked before the deferred one).
    pub fn is_sequence(&self) -> bool {
        matches!(self, Self::List(_) | Self::Iter(_) | Self::Template(_))
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Int(n) => f.debug_tuple("Int").field(n).finish(),
            Self::Float(n) => f.debug_tuple("Float").field(n).finish(),
            Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Self::List(items) => f.debug_tuple("List").field(items).finish(),
            Self::Iter(_) => f.write_str("Iter(..)"),
            Self::Template(t) => f.debug_tuple("Template").field(t).finish(),
            Self::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

/// Boxed one-shot iterator of values.
pub struct ValueIter(Box<dyn Iterator<Item = Value> + Send>);

impl ValueIter {
    /// Box an iterator, converting its items into [`Value`]s as they are pulled.
    pub fn new<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value> + 'static,
        I::IntoIter: Send + 'static,
    {
        Self(Box::new(items.into_iter().map(Into::into)))
    }
}

impl fmt::Debug for ValueIter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ValueIter(..)")
    }
}

impl Iterator for ValueIter {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        self.0.next()
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Self::Text(Cow::Owned(text.to_owned()))
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Self::Text(Cow::Owned(text))
    }
}

impl From<&String> for Value {
    fn from(text: &String) -> Self {
        Self::Text(Cow::Owned(text.clone()))
    }
}

impl From<Cow<'static, str>> for Value {
    fn from(text: Cow<'static, str>) -> Self {
        Self::Text(text)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Self::Text(Cow::Owned(c.to_string()))
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Self::Int(i64::from(n))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

// Wider unsigned integers may not fit an i64; keep their exact decimal form.
macro_rules! impl_from_wide_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    match i64::try_from(n) {
                        Ok(n) => Self::Int(n),
                        Err(_) => Self::Text(Cow::Owned(n.to_string())),
                    }
                }
            }
        )*
    };
}

impl_from_wide_int!(u64, usize, isize, i128, u128);

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Self::Float(f64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Value {
    fn from(items: [T; N]) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Text(Cow::Borrowed("")), Into::into)
    }
}

impl From<Template> for Value {
    fn from(template: Template) -> Self {
        Self::Template(template)
    }
}

impl From<Deferred> for Value {
    fn from(deferred: Deferred) -> Self {
        Self::Deferred(deferred)
    }
}

impl From<ValueIter> for Value {
    fn from(iter: ValueIter) -> Self {
        Self::Iter(iter)
    }
}
