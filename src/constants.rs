//! Constants used across the crate.
//!
//! Defaults for buffer sizes and channel depths, plus the environment variable
//! names read by [`RenderConfig::with_env_overrides`](crate::config::RenderConfig::with_env_overrides).

/// Initial capacity of the renderer's text buffer (8 KiB).
///
/// The buffer grows as needed; this only avoids the first few reallocations
/// for typical page fragments.
pub const DEFAULT_BUFFER_CAPACITY: usize = 8 * 1024;

/// Depth of the channel between a spawned render task and its stream consumer.
///
/// Once this many chunks are queued the render task waits, which is what turns a
/// slow consumer into backpressure on the renderer.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 16;

/// Environment variable that toggles the specializing compiler (`true`/`false`, `1`/`0`).
pub const ENV_SPECIALIZE: &str = "HTML_STREAM_SPECIALIZE";

/// Environment variable bounding the number of cached compiled producers.
pub const ENV_MAX_CACHED_SHAPES: &str = "HTML_STREAM_MAX_CACHED_SHAPES";
