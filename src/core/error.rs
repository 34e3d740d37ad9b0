//! Error handling for html-stream
//!
//! Every failure a render can hit is a variant of [`RenderError`]. The taxonomy is
//! small on purpose and mirrors the three ways a render can go wrong:
//!
//! - **Malformed structure**: [`RenderError::UnsupportedFragment`] - a sequence element or
//!   resolved deferred value is neither text, a sequence, nor another deferred value.
//! - **Deferred rejection**: [`RenderError::DeferredRejected`] - the future behind a
//!   deferred value failed.
//! - **Caller contract violations**: [`RenderError::ArityMismatch`] and
//!   [`RenderError::UnexpectedDeferred`].
//!
//! Transport failures raised by sinks are carried as [`RenderError::Sink`].
//!
//! All variants abort the current render. Nothing in the crate retries; a transport that
//! wants a retry re-invokes the whole render. Chunks already handed to a sink stay
//! delivered.
//!
//! # Examples
//!
//! ```rust
//! use html_stream::core::RenderError;
//!
//! let err = RenderError::UnsupportedFragment { kind: "number" };
//! assert!(!err.is_contract_violation());
//! assert_eq!(err.to_string(), "unsupported fragment: number values cannot be emitted inside a sequence");
//! ```

use std::sync::Arc;

use thiserror::Error;

use crate::template::ShapeId;

/// Result alias used throughout the crate.
pub type Result<T, E = RenderError> = std::result::Result<T, E>;

/// The error type for every rendering operation.
///
/// `RenderError` is `Clone` so the same failure can be handed to a [`Sink`] and returned
/// to the caller. Foreign sources are therefore held behind an [`Arc`].
///
/// [`Sink`]: crate::render::Sink
#[derive(Debug, Clone, Error)]
pub enum RenderError {
    /// A value reached the renderer in fragment position that is not text, a sequence,
    /// or a deferred value (for example a bare number inside a list).
    #[error("unsupported fragment: {kind} values cannot be emitted inside a sequence")]
    UnsupportedFragment {
        /// Human readable kind of the offending value.
        kind: &'static str,
    },

    /// The future behind a deferred value resolved to an error.
    #[error("deferred value rejected: {0:#}")]
    DeferredRejected(Arc<anyhow::Error>),

    /// A template was given a different number of values than its shape has slots.
    #[error("template {shape} expects {expected} interpolated values, got {actual}")]
    ArityMismatch {
        /// Identity of the offending shape.
        shape: ShapeId,
        /// Slot count of the shape.
        expected: usize,
        /// Number of values supplied.
        actual: usize,
    },

    /// A synchronous render met a deferred value.
    #[error("deferred value encountered during synchronous render")]
    UnexpectedDeferred,

    /// The sink failed to accept a chunk.
    #[error("sink error: {0}")]
    Sink(Arc<std::io::Error>),
}

impl RenderError {
    /// Wrap the error of a rejected deferred future.
    pub fn rejected(error: impl Into<anyhow::Error>) -> Self {
        Self::DeferredRejected(Arc::new(error.into()))
    }

    /// Returns true if the error is caused by the caller misusing the API rather
    /// than by data or I/O encountered while rendering.
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Self::ArityMismatch { .. } | Self::UnexpectedDeferred)
    }
}

impl From<std::io::Error> for RenderError {
    fn from(error: std::io::Error) -> Self {
        Self::Sink(Arc::new(error))
    }
}
