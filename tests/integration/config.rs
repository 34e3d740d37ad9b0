//! Configuration files and environment overrides.

use html_stream::constants::{ENV_MAX_CACHED_SHAPES, ENV_SPECIALIZE};
use html_stream::{Engine, RenderConfig, html};
use serial_test::serial;
use tempfile::TempDir;

fn clear_env() {
    // SAFETY: tests touching the environment are serialized.
    unsafe {
        std::env::remove_var(ENV_SPECIALIZE);
        std::env::remove_var(ENV_MAX_CACHED_SHAPES);
    }
}

#[tokio::test]
async fn test_load_from_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("render.toml");
    tokio::fs::write(&path, "specialize = false\nchannel_capacity = 4\n").await.unwrap();

    let config = RenderConfig::load(&path).await.unwrap();
    assert!(!config.specialize);
    assert_eq!(config.channel_capacity, 4);
    assert_eq!(config.max_cached_shapes, None);

    let engine = Engine::with_config(config);
    assert_eq!(engine.render_sync(html!("<b>", "</b>"; "&")).unwrap(), "<b>&amp;</b>");
    assert_eq!(engine.stats().misses, 0);
}

#[test]
fn test_parse_config_sync() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("render.toml");
    std::fs::write(&path, "max_cached_shapes = 100\nbuffer_capacity = 1024\n").unwrap();

    let config = RenderConfig::parse_config(&path).unwrap();
    assert_eq!(config.max_cached_shapes, Some(100));
    assert_eq!(config.buffer_capacity, 1024);
    assert!(config.specialize);
}

#[tokio::test]
async fn test_invalid_file_names_path() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("broken.toml");
    tokio::fs::write(&path, "buffer_capacity = \"large\"").await.unwrap();

    let err = RenderConfig::load(&path).await.unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("broken.toml"), "got: {message}");
}

#[tokio::test]
async fn test_missing_file() {
    let temp = TempDir::new().unwrap();
    let err = RenderConfig::load(temp.path().join("absent.toml")).await.unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    clear_env();
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("render.toml");
    std::fs::write(&path, "specialize = true\nmax_cached_shapes = 10\n").unwrap();

    // SAFETY: serialized.
    unsafe {
        std::env::set_var(ENV_SPECIALIZE, "0");
        std::env::set_var(ENV_MAX_CACHED_SHAPES, "3");
    }
    let config = RenderConfig::parse_config(&path).unwrap().with_env_overrides().unwrap();
    clear_env();

    assert!(!config.specialize);
    assert_eq!(config.max_cached_shapes, Some(3));
}

#[test]
#[serial]
fn test_invalid_environment_value() {
    clear_env();
    // SAFETY: serialized.
    unsafe {
        std::env::set_var(ENV_MAX_CACHED_SHAPES, "lots");
    }
    let err = RenderConfig::default().with_env_overrides().unwrap_err();
    clear_env();

    assert!(format!("{err:#}").contains("expected a number"));
}
