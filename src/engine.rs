//! Rendering entry point.
//!
//! [`Engine`] ties the pieces together: it decides whether templates are expanded by the
//! plain [`Sequencer`] or the specializing [`Compiler`], owns the compiler's producer
//! cache, and offers the render entry points a host application calls.
//!
//! Engines are cheap to clone; clones share configuration and compiled producers.
//!
//! # Examples
//!
//! ```rust
//! use html_stream::{html, Deferred, Engine};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> html_stream::core::Result<()> {
//! let engine = Engine::new();
//! let title = Deferred::ok(async { "Inbox" });
//! let page = html!("<h1>", "</h1><p>", " unread</p>"; title, 3);
//!
//! assert_eq!(engine.render_to_string(page).await?, "<h1>Inbox</h1><p>3 unread</p>");
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use futures::Stream;

use crate::compiler::{CacheStats, Compiler};
use crate::config::RenderConfig;
use crate::core::Result;
use crate::fragment::Fragment;
use crate::render::{self, BufferSink, Cursor, Expander, RenderOutcome, Sink};
use crate::sequencer::Sequencer;
use crate::template::Template;

/// Configured renderer with a shared producer cache.
#[derive(Debug, Clone)]
pub struct Engine {
    config: Arc<RenderConfig>,
    compiler: Arc<Compiler>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// An engine with default configuration.
    pub fn new() -> Self {
        Self::with_config(RenderConfig::default())
    }

    /// An engine with its own compiler sized from `config`.
    pub fn with_config(config: RenderConfig) -> Self {
        let compiler = Arc::new(Compiler::from_config(&config));
        Self::with_compiler(config, compiler)
    }

    /// An engine that shares `compiler` (and its cached producers) with others.
    pub fn with_compiler(config: RenderConfig, compiler: Arc<Compiler>) -> Self {
        tracing::debug!(
            "engine created (specialize: {}, max cached shapes: {:?})",
            config.specialize,
            config.max_cached_shapes
        );
        Self {
            config: Arc::new(config),
            compiler,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// The compiler backing this engine.
    pub fn compiler(&self) -> &Arc<Compiler> {
        &self.compiler
    }

    /// Compiler cache counters.
    pub fn stats(&self) -> CacheStats {
        self.compiler.stats()
    }

    /// Expand the top level of `template` into a fragment.
    ///
    /// With specialization on, this runs the compiled producer and returns its fused
    /// fragments. Otherwise the template is returned as a lazy sequence. Nested templates
    /// are expanded by the renderer either way.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::ArityMismatch`](crate::RenderError::ArityMismatch) if the
    /// template's value count does not fit its shape.
    pub fn fragment(&self, template: Template) -> Result<Fragment> {
        if self.config.specialize {
            self.compiler.produce(template)
        } else {
            template.check_arity()?;
            Ok(Fragment::from(template))
        }
    }

    /// Render into `sink`.
    ///
    /// # Errors
    ///
    /// See [`render::render`]. The sink has already seen [`Sink::fail`] with the same
    /// error.
    pub async fn render<S: Sink>(
        &self,
        root: impl Into<Fragment>,
        sink: &mut S,
    ) -> Result<RenderOutcome> {
        render::render_with_capacity(root.into(), self, sink, self.config.buffer_capacity).await
    }

    /// Render into a single string.
    ///
    /// # Errors
    ///
    /// Same as [`render`](Self::render).
    pub async fn render_to_string(&self, root: impl Into<Fragment>) -> Result<String> {
        let mut sink = BufferSink::new();
        self.render(root, &mut sink).await?;
        Ok(sink.concat())
    }

    /// Render a tree without deferred values, without an async runtime.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::UnexpectedDeferred`](crate::RenderError::UnexpectedDeferred)
    /// if a deferred value is reached, and otherwise fails like [`render`](Self::render).
    pub fn render_sync(&self, root: impl Into<Fragment>) -> Result<String> {
        render::render_sync(root.into(), self)
    }

    /// Render on a spawned task, yielding chunks as a stream.
    ///
    /// Empty chunks are not yielded. A failed render ends the stream with one `Err` item.
    /// Dropping the stream cancels the render. Must be called from within a tokio runtime.
    pub fn render_stream<R>(&self, root: R) -> impl Stream<Item = Result<String>> + Send + use<R>
    where
        R: Into<Fragment>,
    {
        render::render_stream_with(
            root.into(),
            self.clone(),
            self.config.buffer_capacity,
            self.config.channel_capacity,
        )
    }
}

impl Expander for Engine {
    fn expand(&self, template: Template) -> Result<Cursor> {
        if self.config.specialize {
            self.compiler.expand(template)
        } else {
            Sequencer.expand(template)
        }
    }
}
