//! Specializing compiler.
//!
//! A template call site always passes the same static segments, so its layout can be
//! compiled once into a [`Producer`] and reused for every later call. The producer
//! walks a precomputed [`Plan`] and concatenates static text and escaped scalar values
//! into as few literals as possible, cutting only where a slot holds a sequence or a
//! deferred value. Whether a slot does is only known once the value arrives, so each
//! slot still dispatches on its value at runtime; what the compiler saves is fragments,
//! and with them renderer work.
//!
//! # Caching
//!
//! Producers live in a [`ProducerCache`] owned by the [`Compiler`], keyed by
//! [`ShapeId`](crate::template::ShapeId). Share one compiler between engines with an
//! `Arc` to share producers; nothing is cached globally.
//!
//! ```rust
//! use html_stream::compiler::Compiler;
//! use html_stream::html;
//!
//! fn row(cell: i64) -> html_stream::Template {
//!     html!("<td>", "</td>"; cell)
//! }
//!
//! let compiler = Compiler::new();
//! compiler.produce(row(1)).unwrap();
//! compiler.produce(row(2)).unwrap();
//!
//! let stats = compiler.stats();
//! assert_eq!((stats.hits, stats.misses), (1, 1));
//! ```

mod cache;
mod plan;

use std::sync::Arc;

pub use cache::{CacheStats, ProducerCache};
pub use plan::{Plan, Producer, Step};

use crate::config::RenderConfig;
use crate::core::Result;
use crate::fragment::Fragment;
use crate::template::{Shape, Template};

/// Compiles shapes into cached [`Producer`]s.
#[derive(Debug, Default)]
pub struct Compiler {
    cache: ProducerCache,
}

impl Compiler {
    /// A compiler with an unbounded cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// A compiler whose cache retains at most `max_cached_shapes` producers.
    pub fn with_capacity(max_cached_shapes: Option<usize>) -> Self {
        Self {
            cache: ProducerCache::with_capacity(max_cached_shapes),
        }
    }

    /// A compiler sized from configuration.
    pub fn from_config(config: &RenderConfig) -> Self {
        Self::with_capacity(config.max_cached_shapes)
    }

    /// Return the producer for `shape`, compiling it on first use.
    pub fn compile(&self, shape: &Shape) -> Arc<Producer> {
        self.cache.get_or_compile(shape)
    }

    /// Run the template through its shape's producer.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::ArityMismatch`](crate::RenderError::ArityMismatch) if the
    /// template's value count does not fit its shape.
    pub fn produce(&self, template: Template) -> Result<Fragment> {
        let (shape, values) = template.into_parts();
        self.compile(&shape).produce(values)
    }

    /// Like [`produce`](Self::produce) but returns the fragment list directly.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use html_stream::{Compiler, Deferred, Fragment, html};
    ///
    /// let compiler = Compiler::new();
    /// let fragments = compiler
    ///     .produce_fragments(html!("<p>", " and ", "</p>"; "a&b", Deferred::ready("c")))
    ///     .unwrap();
    ///
    /// assert_eq!(fragments.len(), 3);
    /// assert!(matches!(&fragments[0], Fragment::Literal(text) if text == "<p>a&amp;b and "));
    /// assert!(matches!(fragments[1], Fragment::Deferred(_)));
    /// ```
    ///
    /// # Errors
    ///
    /// Same as [`produce`](Self::produce).
    pub fn produce_fragments(&self, template: Template) -> Result<Vec<Fragment>> {
        let (shape, values) = template.into_parts();
        self.compile(&shape).produce_fragments(values)
    }

    /// The underlying cache.
    pub fn cache(&self) -> &ProducerCache {
        &self.cache
    }

    /// Cache counters.
    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
