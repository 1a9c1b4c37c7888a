//! Configuration resolution tests
//!
//! Tests that manipulate TUBEPULSE_YOUTUBE_API_KEY are marked with #[serial]
//! so they never race each other.

use serial_test::serial;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;
use tubepulse_common::config::{
    load_toml_config, CompiledDefaults, ConfigOverrides, ServiceConfig, TomlConfig, API_KEY_ENV,
    DEFAULT_API_BASE_URL,
};

#[test]
fn test_compiled_defaults() {
    let defaults = CompiledDefaults::for_current_platform();

    assert_eq!(defaults.api_base_url, DEFAULT_API_BASE_URL);
    assert_eq!(defaults.request_timeout_secs, 10);
    assert_eq!(defaults.max_concurrent_videos, 3);
    assert_eq!(defaults.video_limit, 5);
    assert_eq!(defaults.comment_limit, 5);
    assert!(defaults.database_path.ends_with("tubepulse.db"));
}

#[test]
#[serial]
fn test_resolve_uses_defaults_when_only_key_given() {
    env::remove_var(API_KEY_ENV);

    let overrides = ConfigOverrides {
        api_key: Some("cli-key".to_string()),
        ..Default::default()
    };
    let config = ServiceConfig::resolve(overrides, TomlConfig::default()).unwrap();

    assert_eq!(config.api_key.expose(), "cli-key");
    assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    assert_eq!(config.request_timeout, Duration::from_secs(10));
    assert_eq!(config.max_concurrent_videos, 3);
    assert_eq!(config.log_level, "info");
}

#[test]
#[serial]
fn test_resolve_overrides_beat_toml() {
    env::remove_var(API_KEY_ENV);

    let toml_config = TomlConfig {
        api_key: Some("toml-key".to_string()),
        database_path: Some(PathBuf::from("/tmp/toml.db")),
        video_limit: Some(8),
        ..Default::default()
    };
    let overrides = ConfigOverrides {
        database_path: Some(PathBuf::from("/tmp/cli.db")),
        ..Default::default()
    };

    let config = ServiceConfig::resolve(overrides, toml_config).unwrap();

    assert_eq!(config.api_key.expose(), "toml-key");
    assert_eq!(config.database_path, PathBuf::from("/tmp/cli.db"));
    assert_eq!(config.video_limit, 8);
}

#[test]
#[serial]
fn test_resolve_env_key_beats_toml() {
    env::set_var(API_KEY_ENV, "env-key");

    let toml_config = TomlConfig {
        api_key: Some("toml-key".to_string()),
        ..Default::default()
    };
    let config = ServiceConfig::resolve(ConfigOverrides::default(), toml_config).unwrap();
    env::remove_var(API_KEY_ENV);

    assert_eq!(config.api_key.expose(), "env-key");
}

#[test]
#[serial]
fn test_resolve_without_key_fails() {
    env::remove_var(API_KEY_ENV);

    let result = ServiceConfig::resolve(ConfigOverrides::default(), TomlConfig::default());
    assert!(result.is_err());
}

#[test]
#[serial]
fn test_worker_count_clamped_to_ceiling() {
    env::remove_var(API_KEY_ENV);

    let overrides = ConfigOverrides {
        api_key: Some("k".to_string()),
        max_concurrent_videos: Some(32),
        ..Default::default()
    };
    let config = ServiceConfig::resolve(overrides, TomlConfig::default()).unwrap();

    assert_eq!(config.max_concurrent_videos, 5);
}

#[test]
#[serial]
fn test_zero_rate_rejected() {
    env::remove_var(API_KEY_ENV);

    let overrides = ConfigOverrides {
        api_key: Some("k".to_string()),
        requests_per_second: Some(0),
        ..Default::default()
    };
    assert!(ServiceConfig::resolve(overrides, TomlConfig::default()).is_err());
}

#[test]
#[serial]
fn test_zero_timeout_rejected() {
    env::remove_var(API_KEY_ENV);

    let overrides = ConfigOverrides {
        api_key: Some("k".to_string()),
        request_timeout_secs: Some(0),
        ..Default::default()
    };
    let err = ServiceConfig::resolve(overrides, TomlConfig::default()).unwrap_err();
    assert!(err.to_string().contains("request_timeout_secs"));

    // The TOML value is validated the same way
    let toml_config = TomlConfig {
        api_key: Some("k".to_string()),
        request_timeout_secs: Some(0),
        ..Default::default()
    };
    assert!(ServiceConfig::resolve(ConfigOverrides::default(), toml_config).is_err());
}

#[test]
fn test_load_explicit_toml_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
        api_base_url = "http://127.0.0.1:9000"
        comment_limit = 10
        "#,
    )
    .unwrap();

    let config = load_toml_config(Some(&path)).unwrap();

    assert_eq!(config.api_base_url.as_deref(), Some("http://127.0.0.1:9000"));
    assert_eq!(config.comment_limit, Some(10));
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_load_missing_explicit_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("absent.toml");

    assert!(load_toml_config(Some(&path)).is_err());
}

#[test]
fn test_load_malformed_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(&path, "video_limit = \"five\"").unwrap();

    assert!(load_toml_config(Some(&path)).is_err());
}
