//! Test utilities.
//!
//! Helpers for exercising the renderer under controlled timing:
//!
//! - [`init_test_logging`] turns on `tracing` output inside tests,
//! - [`gate`] builds a deferred value resolved by hand,
//! - [`delayed`] builds a deferred value that resolves after a fixed delay.
//!
//! # Example
//!
//! ```rust
//! use html_stream::test_utils::gate;
//! use html_stream::{html, Engine};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let (handle, deferred) = gate();
//! let engine = Engine::new();
//! let render = tokio::spawn(async move { engine.render_to_string(html!("[", "]"; deferred)).await });
//!
//! handle.resolve("ok");
//! assert_eq!(render.await.unwrap().unwrap(), "[ok]");
//! # }
//! ```

use std::sync::Once;
use std::time::Duration;

use tokio::sync::oneshot;
use tracing_subscriber::EnvFilter;

use crate::fragment::Deferred;
use crate::template::Value;

static INIT_LOGGING: Once = Once::new();

pub use tracing::Level;

/// Initialize test logging once per process.
///
/// With `Some(level)` logs at that level; with `None` follows `RUST_LOG`, and stays
/// silent if it is unset.
///
/// ```bash
/// RUST_LOG=html_stream=trace cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}

/// Resolves or rejects the deferred value returned alongside it by [`gate`].
#[derive(Debug)]
pub struct GateHandle {
    tx: oneshot::Sender<anyhow::Result<Value>>,
}

impl GateHandle {
    /// Resolve the deferred value. Returns `false` if it was already dropped.
    pub fn resolve(self, value: impl Into<Value>) -> bool {
        self.tx.send(Ok(value.into())).is_ok()
    }

    /// Reject the deferred value. Returns `false` if it was already dropped.
    pub fn reject(self, reason: impl Into<String>) -> bool {
        self.tx.send(Err(anyhow::anyhow!(reason.into()))).is_ok()
    }

    /// Whether the deferred value has been dropped, e.g. by a cancelled render.
    pub fn is_abandoned(&self) -> bool {
        self.tx.is_closed()
    }
}

/// A deferred value that resolves when the returned handle says so.
///
/// Dropping the handle without resolving rejects the value.
pub fn gate() -> (GateHandle, Deferred) {
    let (tx, rx) = oneshot::channel::<anyhow::Result<Value>>();
    let deferred = Deferred::new(async move {
        match rx.await {
            Ok(result) => result,
            Err(_) => Err(anyhow::anyhow!("gate handle dropped")),
        }
    });
    (
        GateHandle {
            tx,
        },
        deferred,
    )
}

/// A deferred value that resolves to `value` after `ms` milliseconds.
///
/// The timer starts immediately on the tokio runtime, so several delayed values run
/// concurrently, as they would against a real backend.
pub fn delayed<V>(ms: u64, value: V) -> Deferred
where
    V: Into<Value> + Send + 'static,
{
    Deferred::spawn(async move {
        tokio::time::sleep(Duration::from_millis(ms)).await;
        Ok::<_, anyhow::Error>(value)
    })
}

/// A deferred value that rejects with `reason` after `ms` milliseconds.
pub fn failing(ms: u64, reason: &'static str) -> Deferred {
    Deferred::spawn(async move {
        tokio::time::sleep(Duration::from_millis(ms)).await;
        Err::<Value, _>(anyhow::anyhow!(reason))
    })
}
