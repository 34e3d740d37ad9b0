//! The typed output tree.
//!
//! A [`Fragment`] is one of three things:
//!
//! - [`Fragment::Literal`]: text that is already safe to emit,
//! - [`Fragment::Sequence`]: an ordered, lazily expanded group of fragments,
//! - [`Fragment::Deferred`]: a value that is not available yet.
//!
//! Raw [`Value`]s become fragments through one of two rules, applied exactly once at the
//! point where the value enters the tree:
//!
//! | value | [`Fragment::interpolate`] (template slot) | [`Fragment::from_item`] (list item, resolved value) |
//! |---|---|---|
//! | list, iterator, template | sequence | sequence |
//! | deferred | deferred | deferred |
//! | text | escaped literal | literal, verbatim |
//! | number, boolean | stringified literal | [`RenderError::UnsupportedFragment`] |
//!
//! The iterable capability is always checked before the deferred one.

mod deferred;

use std::borrow::Cow;
use std::fmt::Write as _;

pub use deferred::Deferred;

use crate::core::{RenderError, Result};
use crate::template::{Template, Value, ValueIter, escape_into, escape_owned};

/// A node of the output tree.
#[derive(Debug)]
pub enum Fragment {
    /// Escaped or trusted text, emitted as-is.
    Literal(Cow<'static, str>),
    /// Nested fragments, emitted depth-first in order.
    Sequence(Sequence),
    /// A value the renderer waits for at this position.
    Deferred(Deferred),
}

impl Fragment {
    /// A literal fragment. The text is trusted and will not be escaped.
    pub fn literal(text: impl Into<Cow<'static, str>>) -> Self {
        Self::Literal(text.into())
    }

    /// Classify a value interpolated into a template slot.
    ///
    /// Scalars are stringified and escaped here, and nowhere else.
    pub fn interpolate(value: Value) -> Self {
        match value {
            Value::List(items) => Self::Sequence(Sequence::values(items)),
            Value::Iter(iter) => Self::Sequence(Sequence::iter(iter)),
            Value::Template(template) => Self::Sequence(Sequence::template(template)),
            Value::Deferred(deferred) => Self::Deferred(deferred),
            Value::Text(text) => Self::Literal(escape_owned(text)),
            Value::Int(n) => Self::Literal(Cow::Owned(n.to_string())),
            Value::Float(n) => Self::Literal(Cow::Owned(n.to_string())),
            Value::Bool(b) => Self::Literal(Cow::Borrowed(if b { "true" } else { "false" })),
        }
    }

    /// Classify a value in fragment position: a list element, an iterator item, or the
    /// result of a deferred value.
    ///
    /// Text in this position is already markup and is kept verbatim.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use html_stream::{Fragment, Value};
    ///
    /// let fragment = Fragment::from_item(Value::from("<li>raw</li>")).unwrap();
    /// assert!(matches!(fragment, Fragment::Literal(ref text) if text == "<li>raw</li>"));
    /// assert!(Fragment::from_item(Value::from(3)).is_err());
    /// ```
    ///
    /// # Errors
    ///
    /// Numbers and booleans have no markup form and fail with
    /// [`RenderError::UnsupportedFragment`](crate::RenderError::UnsupportedFragment).
    pub fn from_item(value: Value) -> Result<Self> {
        match value {
            Value::List(items) => Ok(Self::Sequence(Sequence::values(items))),
            Value::Iter(iter) => Ok(Self::Sequence(Sequence::iter(iter))),
            Value::Template(template) => Ok(Self::Sequence(Sequence::template(template))),
            Value::Deferred(deferred) => Ok(Self::Deferred(deferred)),
            Value::Text(text) => Ok(Self::Literal(text)),
            other @ (Value::Int(_) | Value::Float(_) | Value::Bool(_)) => {
                Err(RenderError::UnsupportedFragment {
                    kind: other.kind(),
                })
            }
        }
    }
}

/// Interpolate `value` straight into `out` when it is a scalar.
///
/// Returns the classified fragment instead when the value is a sequence or a deferred
/// value, leaving `out` untouched.
pub(crate) fn interpolate_into(value: Value, out: &mut String) -> Option<Fragment> {
    match value {
        Value::Text(text) => escape_into(&text, out),
        Value::Int(n) => {
            let _ = write!(out, "{n}");
        }
        Value::Float(n) => {
            let _ = write!(out, "{n}");
        }
        Value::Bool(b) => out.push_str(if b { "true" } else { "false" }),
        other => return Some(Fragment::interpolate(other)),
    }
    None
}

impl From<Template> for Fragment {
    fn from(template: Template) -> Self {
        Self::Sequence(Sequence::template(template))
    }
}

impl From<Deferred> for Fragment {
    fn from(deferred: Deferred) -> Self {
        Self::Deferred(deferred)
    }
}

impl From<Sequence> for Fragment {
    fn from(sequence: Sequence) -> Self {
        Self::Sequence(sequence)
    }
}

/// An ordered group of fragments, expanded only when the renderer reaches it.
#[derive(Debug)]
pub struct Sequence(pub(crate) Items);

#[derive(Debug)]
pub(crate) enum Items {
    Template(Template),
    Values(Vec<Value>),
    Iter(ValueIter),
    Fragments(Vec<Fragment>),
}

impl Sequence {
    /// A nested template, expanded by the engine that renders it.
    pub fn template(template: Template) -> Self {
        Self(Items::Template(template))
    }

    /// Values emitted in fragment position.
    pub fn values(values: Vec<Value>) -> Self {
        Self(Items::Values(values))
    }

    /// A one-shot iterator of values emitted in fragment position.
    pub fn iter(iter: ValueIter) -> Self {
        Self(Items::Iter(iter))
    }

    /// Already classified fragments.
    pub fn fragments(fragments: Vec<Fragment>) -> Self {
        Self(Items::Fragments(fragments))
    }

    /// The fragments, if this sequence was built from classified fragments.
    pub fn as_fragments(&self) -> Option<&[Fragment]> {
        match &self.0 {
            Items::Fragments(fragments) => Some(fragments),
            _ => None,
        }
    }
}
