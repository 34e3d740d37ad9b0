//! Generic TOML parsing with file path context.
//!
//! ```rust,no_run
//! use html_stream::config::parse_config;
//! use html_stream::config::RenderConfig;
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! let config: RenderConfig = parse_config(Path::new("render.toml"))?;
//! println!("specialize: {}", config.specialize);
//! # Ok(())
//! # }
//! ```
//!
//! Errors name the file and the failed step:
//!
//! ```text
//! Failed to parse config file: /srv/app/render.toml
//! Caused by:
//!     invalid type: string "yes", expected a boolean
//! ```

use anyhow::{Context, Result};
use std::path::Path;

/// Read `path` and deserialize it from TOML.
///
/// # Errors
///
/// Returns an error if:
/// - the file cannot be read
/// - the content is not valid TOML
/// - the TOML does not match `T`
///
/// Every error carries the file path as context.
///
/// # Thread Safety
///
/// Blocks on file I/O. From async code use [`load_config`] instead.
pub fn parse_config<T>(path: &Path) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_config_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Async variant of [`parse_config`] using `tokio::fs`.
///
/// # Errors
///
/// Same as [`parse_config`].
pub async fn load_config<T>(path: &Path) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_config_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Deserialize TOML text.
///
/// # Errors
///
/// Fails if `content` is not valid TOML or does not match `T`.
pub fn parse_config_str<T>(content: &str) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let config: T = toml::from_str(content)?;
    Ok(config)
}
