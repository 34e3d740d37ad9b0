//! Stream renderer.
//!
//! Converts a fragment tree into ordered text chunks delivered to a [`Sink`]. The walk
//! itself is synchronous (see [`Walker`]); the async driver in this module only awaits
//! at deferred values and at the sink. As a result a render emits exactly
//! `1 + number of deferred values` chunks, however many fragments the tree has: one
//! before each deferred value is awaited and one at the end. A chunk may be empty, for
//! example when a template starts with a deferred value.
//!
//! # Ordering
//!
//! Chunks arrive in depth-first, left-to-right tree order. Each deferred value is awaited
//! at its own position before anything after it is walked, so a later value that
//! resolves first cannot overtake an earlier one.
//!
//! # Failure and cancellation
//!
//! - Any error aborts the render, discards unflushed text, calls [`Sink::fail`] once, and
//!   is returned to the caller. Chunks already accepted are not retracted.
//! - If [`Sink::accept`] returns [`Flow::Stop`], the render ends with
//!   [`RenderOutcome::Cancelled`]: nothing else is pulled, pending deferred values are
//!   dropped without being awaited, and the sink is neither completed nor failed.
//! - If [`Sink::closed`] resolves while a deferred value is pending, the render ends the
//!   same way without waiting for that value.

mod cursor;
mod sink;
mod walker;


use futures::Stream;

pub use cursor::{Cursor, Expander};
pub use sink::{BufferSink, ChannelSink, Flow, Sink, SinkStatus, WriterSink};
pub use walker::{Step, WalkState, Walker};

use crate::constants::{DEFAULT_BUFFER_CAPACITY, DEFAULT_CHANNEL_CAPACITY};
use crate::core::{RenderError, Result};
use crate::fragment::Fragment;

/// How a render that did not fail ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Every fragment was emitted and the sink was completed.
    Completed {
        /// Number of chunks handed to the sink.
        chunks: usize,
    },
    /// The sink asked to stop.
    Cancelled {
        /// Number of chunks handed to the sink, including the one answered with `Stop`.
        chunks: usize,
    },
}

impl RenderOutcome {
    /// Number of chunks handed to the sink.
    pub fn chunks(&self) -> usize {
        match self {
            Self::Completed {
                chunks,
            }
            | Self::Cancelled {
                chunks,
            } => *chunks,
        }
    }

    /// Whether the render ran to completion.
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// Render `root` into `sink`, expanding nested templates with `expander`.
///
/// # Examples
///
/// ```rust
/// use html_stream::{BufferSink, Deferred, Sequencer, html, render::render};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> html_stream::Result<()> {
/// let mut sink = BufferSink::new();
/// let page = html!("<p>", "</p>"; Deferred::ready("late"));
/// let outcome = render(page.into(), Sequencer, &mut sink).await?;
///
/// assert_eq!(outcome.chunks(), 2);
/// assert_eq!(sink.chunks(), ["<p>", "late</p>"]);
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns the first error raised while walking the tree: an arity mismatch, an
/// unsupported fragment, a rejected deferred value, or an error from the sink itself.
/// The same error has already been passed to [`Sink::fail`] when this returns.
pub async fn render<E, S>(root: Fragment, expander: E, sink: &mut S) -> Result<RenderOutcome>
where
    E: Expander,
    S: Sink,
{
    render_with_capacity(root, expander, sink, DEFAULT_BUFFER_CAPACITY).await
}

/// Like [`render`] with an explicit initial buffer capacity.
///
/// # Errors
///
/// Same as [`render`].
pub async fn render_with_capacity<E, S>(
    root: Fragment,
    expander: E,
    sink: &mut S,
    capacity: usize,
) -> Result<RenderOutcome>
where
    E: Expander,
    S: Sink,
{
    let mut walker = Walker::with_capacity(root, expander, capacity);
    let mut chunks = 0;

    loop {
        let step = match walker.step() {
            Ok(step) => step,
            Err(err) => return Err(abort(sink, err).await),
        };

        let deferred = match step {
            Step::Done {
                chunk,
            } => {
                chunks += 1;
                // The tree is exhausted, so a Stop here changes nothing.
                if let Err(err) = sink.accept(chunk).await {
                    return Err(abort(sink, err).await);
                }
                if let Err(err) = sink.complete().await {
                    return Err(abort(sink, err).await);
                }
                tracing::debug!("render completed in {} chunk(s)", chunks);
                return Ok(RenderOutcome::Completed {
                    chunks,
                });
            }
            Step::Suspend {
                chunk,
                deferred,
            } => {
                chunks += 1;
                match sink.accept(chunk).await {
                    Ok(Flow::Continue) => deferred,
                    Ok(Flow::Stop) => return Ok(stopped(chunks)),
                    Err(err) => return Err(abort(sink, err).await),
                }
            }
        };

        tracing::trace!("suspended at depth {}", walker.depth());
        let mut pending = deferred;
        loop {
            let resolved = tokio::select! {
                biased;
                resolved = pending.resolve() => resolved,
                () = sink.closed() => {
                    tracing::debug!("consumer went away while a deferred value was pending");
                    return Ok(RenderOutcome::Cancelled {
                        chunks,
                    });
                }
            };
            let value = match resolved {
                Ok(value) => value,
                Err(err) => return Err(abort(sink, walker.fail(err)).await),
            };
            match walker.resume(value) {
                Ok(None) => break,
                Ok(Some(next)) => {
                    // A value that resolved to another deferred value still gets its own
                    // emission, which is empty.
                    chunks += 1;
                    match sink.accept(String::new()).await {
                        Ok(Flow::Continue) => pending = next,
                        Ok(Flow::Stop) => return Ok(stopped(chunks)),
                        Err(err) => return Err(abort(sink, err).await),
                    }
                }
                Err(err) => return Err(abort(sink, err).await),
            }
        }
        tracing::trace!("resumed at depth {}", walker.depth());
    }
}

fn stopped(chunks: usize) -> RenderOutcome {
    tracing::debug!("sink stopped the render after {} chunk(s)", chunks);
    RenderOutcome::Cancelled {
        chunks,
    }
}

async fn abort<S: Sink>(sink: &mut S, err: RenderError) -> RenderError {
    tracing::warn!("render failed: {}", err);
    sink.fail(&err).await;
    err
}

/// Render `root` into a single string.
///
/// # Errors
///
/// Same as [`render`].
pub async fn render_to_string<E: Expander>(root: Fragment, expander: E) -> Result<String> {
    let mut sink = BufferSink::new();
    render(root, expander, &mut sink).await?;
    Ok(sink.concat())
}

/// Render `root` without an async runtime.
///
/// # Errors
///
/// Fails with [`RenderError::UnexpectedDeferred`] if the walk reaches a deferred value,
/// and otherwise like [`render`].
pub fn render_sync<E: Expander>(root: Fragment, expander: E) -> Result<String> {
    let mut walker = Walker::new(root, expander);
    match walker.step()? {
        Step::Done {
            chunk,
        } => Ok(chunk),
        Step::Suspend {
            ..
        } => Err(walker.fail(RenderError::UnexpectedDeferred)),
    }
}

/// Render `root` on a spawned tokio task and expose the chunks as a stream.
///
/// The stream ends after the last chunk. Empty chunks are not yielded. A failed render
/// yields one final `Err` item. Dropping the stream cancels the render at once, even if
/// it is waiting on a deferred value. Must be called from within a tokio runtime.
pub fn render_stream<E>(root: Fragment, expander: E) -> impl Stream<Item = Result<String>> + Send + 'static
where
    E: Expander + Send + 'static,
{
    render_stream_with(root, expander, DEFAULT_BUFFER_CAPACITY, DEFAULT_CHANNEL_CAPACITY)
}

/// Like [`render_stream`] with explicit buffer and channel capacities.
pub fn render_stream_with<E>(
    root: Fragment,
    expander: E,
    capacity: usize,
    channel_capacity: usize,
) -> impl Stream<Item = Result<String>> + Send + 'static
where
    E: Expander + Send + 'static,
{
    let (mut sink, rx) = ChannelSink::channel(channel_capacity);
    tokio::spawn(async move {
        // The outcome reaches the consumer through the channel.
        let _ = render_with_capacity(root, expander, &mut sink, capacity).await;
    });
    futures::stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await? {
                Ok(chunk) if chunk.is_empty() => continue,
                item => return Some((item, rx)),
            }
        }
    })
}
