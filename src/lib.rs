//! html-stream - streaming HTML templates
//!
//! Renders templates to HTML as an ordered stream of text chunks. Interpolated values are
//! escaped exactly once, nested templates and lists compose freely, and values that are
//! not ready yet ([`Deferred`]) are awaited in place without ever letting later output
//! overtake them.
//!
//! # Architecture Overview
//!
//! A render moves through three stages:
//!
//! 1. A [`Template`] (static segments plus values, usually built with [`html!`]) is
//!    expanded into [`Fragment`]s, either lazily by the [`Sequencer`] or by a
//!    [`Compiler`] producer specialized for the template's call site.
//! 2. The [`render`] module walks the fragment tree depth-first, collecting literal text
//!    into a buffer and suspending only at deferred values.
//! 3. Each buffered run of text is handed to a [`Sink`] as one chunk, so a render with
//!    `n` deferred values emits exactly `n + 1` chunks.
//!
//! # Core Modules
//!
//! - [`template`] - shapes, templates, raw values and HTML escaping
//! - [`fragment`] - the typed output tree and deferred values
//! - [`sequencer`] - unspecialized template expansion
//! - [`compiler`] - specializing producers and their cache
//! - [`render`] - the stream renderer, sinks and drivers
//! - [`engine`] - configured entry point tying the above together
//! - [`config`] - [`RenderConfig`] from TOML and environment
//! - [`core`] - error handling
//!
//! # Example
//!
//! ```rust
//! use html_stream::{html, Deferred, Engine};
//!
//! fn item(name: &str) -> html_stream::Template {
//!     html!("<li>", "</li>"; name)
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> html_stream::Result<()> {
//! let engine = Engine::new();
//! let page = html!(
//!     "<ul>", "</ul><footer>", " items</footer>";
//!     vec![item("a<b"), item("c")],
//!     Deferred::ok(async { "two" })
//! );
//!
//! let mut sink = html_stream::BufferSink::new();
//! let outcome = engine.render(page, &mut sink).await?;
//! assert_eq!(sink.concat(), "<ul><li>a&lt;b</li><li>c</li></ul><footer>two items</footer>");
//! assert_eq!(outcome.chunks(), 2);
//! # Ok(())
//! # }
//! ```

pub mod compiler;
pub mod config;
pub mod constants;
pub mod core;
pub mod engine;
pub mod fragment;
pub mod render;
pub mod sequencer;
pub mod template;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use compiler::{CacheStats, Compiler};
pub use config::RenderConfig;
pub use core::{RenderError, Result};
pub use engine::Engine;
pub use fragment::{Deferred, Fragment, Sequence};
pub use render::{
    BufferSink, ChannelSink, Flow, RenderOutcome, Sink, WriterSink, render_stream,
    render_to_string,
};
pub use sequencer::Sequencer;
pub use template::{Shape, ShapeId, Template, Value, ValueIter, escape_html};
