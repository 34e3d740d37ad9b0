//! Renderer configuration.
//!
//! [`RenderConfig`] controls whether templates are specialized, how many compiled
//! producers are retained, and how output is buffered. Every field has a default, so an
//! empty file (or no file at all) is a valid configuration.
//!
//! ```toml
//! # render.toml
//! specialize = true
//! max_cached_shapes = 4096
//! buffer_capacity = 16384
//! channel_capacity = 32
//! ```
//!
//! Two environment variables override file values:
//!
//! - `HTML_STREAM_SPECIALIZE`: `true`/`false` (also `1`/`0`, `yes`/`no`, `on`/`off`)
//! - `HTML_STREAM_MAX_CACHED_SHAPES`: a number, or `unbounded`
//!
//! ```rust,no_run
//! use html_stream::config::RenderConfig;
//! use html_stream::Engine;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = RenderConfig::load("render.toml").await?.with_env_overrides()?;
//! let engine = Engine::with_config(config);
//! # Ok(())
//! # }
//! ```

mod parser;

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

pub use parser::{load_config, parse_config, parse_config_str};

use crate::constants::{
    DEFAULT_BUFFER_CAPACITY, DEFAULT_CHANNEL_CAPACITY, ENV_MAX_CACHED_SHAPES, ENV_SPECIALIZE,
};

/// Renderer settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Expand templates through compiled producers instead of the plain sequencer.
    pub specialize: bool,

    /// Upper bound on retained producers; `None` is unbounded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_cached_shapes: Option<usize>,

    /// Initial capacity of the renderer's text buffer, in bytes.
    pub buffer_capacity: usize,

    /// Number of chunks a streamed render may run ahead of its consumer.
    pub channel_capacity: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            specialize: true,
            max_cached_shapes: None,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl RenderConfig {
    /// Parse configuration from TOML text. Missing keys take their defaults.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use html_stream::RenderConfig;
    ///
    /// let config = RenderConfig::from_toml_str("specialize = false").unwrap();
    /// assert!(!config.specialize);
    /// assert_eq!(config.max_cached_shapes, None);
    /// ```
    ///
    /// # Errors
    ///
    /// Fails on malformed TOML or a value of the wrong type.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        parse_config_str(content).context("Failed to parse render configuration")
    }

    /// Read configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or does not parse. The error names the file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: Self = load_config(path).await?;
        tracing::debug!("loaded render configuration from {}", path.display());
        Ok(config)
    }

    /// Blocking variant of [`load`](Self::load).
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load).
    pub fn parse_config(path: impl AsRef<Path>) -> Result<Self> {
        parse_config(path.as_ref())
    }

    /// Apply `HTML_STREAM_SPECIALIZE` and `HTML_STREAM_MAX_CACHED_SHAPES` if set.
    ///
    /// # Errors
    ///
    /// Fails if a variable is set to something that does not parse: a boolean for the
    /// first, a count or `unbounded` for the second.
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Ok(raw) = std::env::var(ENV_SPECIALIZE) {
            self.specialize =
                parse_bool(&raw).with_context(|| format!("Invalid value for {ENV_SPECIALIZE}"))?;
            tracing::debug!("{} overrides specialize: {}", ENV_SPECIALIZE, self.specialize);
        }
        if let Ok(raw) = std::env::var(ENV_MAX_CACHED_SHAPES) {
            self.max_cached_shapes = parse_bound(&raw)
                .with_context(|| format!("Invalid value for {ENV_MAX_CACHED_SHAPES}"))?;
            tracing::debug!(
                "{} overrides max_cached_shapes: {:?}",
                ENV_MAX_CACHED_SHAPES,
                self.max_cached_shapes
            );
        }
        Ok(self)
    }
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("expected a boolean, got '{other}'"),
    }
}

fn parse_bound(raw: &str) -> Result<Option<usize>> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("unbounded") {
        return Ok(None);
    }
    let bound = raw.parse::<usize>().with_context(|| format!("expected a number, got '{raw}'"))?;
    Ok(Some(bound))
}
