//! Deferred values: fragments whose content arrives later.

use std::fmt;
use std::future::Future;

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::task::AbortHandle;

use crate::core::{RenderError, Result};
use crate::template::{Value, escape_html};

/// A value that resolves later to text, a sequence, or another deferred value.
///
/// The renderer waits for a deferred value at its position in the tree, so sibling
/// output never overtakes it. The resolved value is classified in fragment position:
/// text is emitted verbatim, numbers are rejected. Use [`Deferred::escaped`] for
/// untrusted text.
///
/// Rust futures do nothing until polled, so a plain deferred value starts its work only
/// when the renderer reaches it. [`Deferred::spawn`] starts the work immediately on the
/// tokio runtime, letting several deferred values make progress at the same time.
pub struct Deferred {
    future: BoxFuture<'static, anyhow::Result<Value>>,
}

impl Deferred {
    /// Wrap a fallible future. An `Err` rejects the render.
    pub fn new<F, V>(future: F) -> Self
    where
        F: Future<Output = anyhow::Result<V>> + Send + 'static,
        V: Into<Value>,
    {
        Self {
            future: future.map(|result| result.map(Into::into)).boxed(),
        }
    }

    /// Wrap an infallible future.
    pub fn ok<F, V>(future: F) -> Self
    where
        F: Future<Output = V> + Send + 'static,
        V: Into<Value>,
    {
        Self {
            future: future.map(|value| Ok(value.into())).boxed(),
        }
    }

    /// A deferred value that is already resolved.
    pub fn ready(value: impl Into<Value>) -> Self {
        let value = value.into();
        Self {
            future: futures::future::ready(Ok(value)).boxed(),
        }
    }

    /// Wrap a future producing untrusted text; the text is HTML-escaped on arrival.
    pub fn escaped<F, S>(future: F) -> Self
    where
        F: Future<Output = anyhow::Result<S>> + Send + 'static,
        S: AsRef<str>,
    {
        Self {
            future: future
                .map(|result| result.map(|text| Value::from(escape_html(text.as_ref()).into_owned())))
                .boxed(),
        }
    }

    /// Run `future` as a tokio task right away.
    ///
    /// The task is aborted if the deferred value is dropped before it resolves, for
    /// example when the sink cancels the render. Must be called from within a tokio
    /// runtime.
    pub fn spawn<F, V>(future: F) -> Self
    where
        F: Future<Output = anyhow::Result<V>> + Send + 'static,
        V: Into<Value> + Send + 'static,
    {
        let handle = tokio::spawn(future);
        let guard = AbortOnDrop(handle.abort_handle());
        Self::new(async move {
            let _guard = guard;
            match handle.await {
                Ok(result) => result.map(Into::into),
                Err(err) => Err(anyhow::Error::new(err).context("deferred task failed")),
            }
        })
    }

    /// Wait for the value.
    ///
    /// # Errors
    ///
    /// A rejection becomes [`RenderError::DeferredRejected`], with the original error as
    /// its source. A spawned task that panicked or was aborted is reported the same way.
    pub async fn resolve(self) -> Result<Value> {
        self.future.await.map_err(RenderError::rejected)
    }
}

impl fmt::Debug for Deferred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Deferred(..)")
    }
}

struct AbortOnDrop(AbortHandle);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}
