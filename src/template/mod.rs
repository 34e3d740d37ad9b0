//! Template invocations: static segments plus interpolated values.
//!
//! A template call is split into two parts before it reaches this crate:
//!
//! - a [`Shape`], the ordered list of static text segments written at a call site, and
//! - the ordered list of [`Value`]s interpolated between them.
//!
//! For `n + 1` segments a template carries `n` values. Static segments are authored by
//! the developer and trusted; they are never escaped. Values are untrusted and are
//! escaped once when they are interpolated.
//!
//! # Shape identity
//!
//! Every `Shape` gets a process-unique [`ShapeId`] when it is created. The
//! [`html!`](crate::html) macro creates one shape per call site (lazily, on first use) and
//! reuses it for every later call, which is what lets the compiler cache a specialized
//! producer per call site. Shapes built at runtime with [`Shape::new`] get a fresh identity
//! each time, so build them once and keep the `Arc` around if the layout repeats.
//!
//! # Examples
//!
//! ```rust
//! use html_stream::{html, Engine};
//!
//! fn greeting(name: &str) -> html_stream::Template {
//!     html!("<p>Hello, ", "!</p>"; name)
//! }
//!
//! let engine = Engine::new();
//! assert_eq!(engine.render_sync(greeting("<World>")).unwrap(), "<p>Hello, &lt;World&gt;!</p>");
//! ```

mod escape;
mod value;

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

pub use escape::{escape_html, escape_into, escape_owned};
pub use value::{Value, ValueIter};

use crate::core::{RenderError, Result};

/// Process-unique identity of a [`Shape`], used as the compiler cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(u64);

impl ShapeId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Build an id from a raw number. Only useful for diagnostics and tests; ids handed
    /// out by [`Shape`] never collide with each other.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw number behind the id.
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shape#{}", self.0)
    }
}

/// The static segment layout of a template call site.
#[derive(Debug)]
pub struct Shape {
    id: ShapeId,
    segments: Box<[Cow<'static, str>]>,
}

impl Shape {
    /// Create a shape from its static segments.
    ///
    /// An empty segment list is treated as a single empty segment, so every shape has at
    /// least one segment and `segments().len() - 1` slots.
    pub fn new<I, S>(segments: I) -> Arc<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<Cow<'static, str>>,
    {
        let mut segments: Vec<Cow<'static, str>> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            segments.push(Cow::Borrowed(""));
        }
        Arc::new(Self {
            id: ShapeId::next(),
            segments: segments.into_boxed_slice(),
        })
    }

    /// Create a shape from string literals without copying them.
    pub fn from_static(segments: &'static [&'static str]) -> Arc<Self> {
        Self::new(segments.iter().copied())
    }

    /// Identity of this shape.
    pub fn id(&self) -> ShapeId {
        self.id
    }

    /// The static segments, in order.
    pub fn segments(&self) -> &[Cow<'static, str>] {
        &self.segments
    }

    /// Number of interpolation slots.
    pub fn slots(&self) -> usize {
        self.segments.len() - 1
    }
}

/// A template invocation: a shape plus the values for its slots.
///
/// Construction never fails. A value count that does not match the shape is reported as
/// [`RenderError::ArityMismatch`] when the template is expanded.
#[derive(Debug)]
pub struct Template {
    shape: Arc<Shape>,
    values: Vec<Value>,
}

impl Template {
    /// Pair a shape with its values.
    pub fn new(shape: Arc<Shape>, values: Vec<Value>) -> Self {
        Self {
            shape,
            values,
        }
    }

    /// The shape of this invocation.
    pub fn shape(&self) -> &Arc<Shape> {
        &self.shape
    }

    /// The interpolated values.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Split into shape and values.
    pub fn into_parts(self) -> (Arc<Shape>, Vec<Value>) {
        (self.shape, self.values)
    }

    /// Check that the template has one value per gap between segments.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::ArityMismatch`] with the expected and actual counts.
    pub fn check_arity(&self) -> Result<()> {
        check_arity(&self.shape, self.values.len())
    }
}

pub(crate) fn check_arity(shape: &Shape, actual: usize) -> Result<()> {
    if shape.slots() == actual {
        Ok(())
    } else {
        Err(RenderError::ArityMismatch {
            shape: shape.id(),
            expected: shape.slots(),
            actual,
        })
    }
}

/// Build a [`Template`] whose [`Shape`] is created once per call site.
///
/// Static segments come first as string literals, separated by commas. Values follow a
/// `;`, one per slot, each converted with `Into<Value>`.
///
/// ```rust
/// use html_stream::{html, Engine};
///
/// let items = vec!["<li>a</li>", "<li>b</li>"];
/// let page = html!("<ul>", "</ul><p>", "</p>"; items, "1 < 2");
/// assert_eq!(
///     Engine::new().render_sync(page).unwrap(),
///     "<ul><li>a</li><li>b</li></ul><p>1 &lt; 2</p>"
/// );
/// ```
#[macro_export]
macro_rules! html {
    ($first:literal $(, $segment:literal)* $(; $($value:expr),* $(,)?)?) => {{
        static SHAPE: ::std::sync::LazyLock<::std::sync::Arc<$crate::template::Shape>> =
            ::std::sync::LazyLock::new(|| {
                $crate::template::Shape::from_static(&[$first $(, $segment)*])
            });
        $crate::template::Template::new(
            ::std::sync::Arc::clone(&*SHAPE),
            ::std::vec![$($(::std::convert::Into::<$crate::template::Value>::into($value)),*)?],
        )
    }};
}
