//! Configuration loading and resolution
//!
//! Bootstrap settings follow this priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! Command-line and environment values arrive together in [`ConfigOverrides`]
//! (clap merges them); the API key is resolved separately by
//! [`resolve_api_key`] so that conflicting sources can be reported.

use crate::{Error, Result};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Environment variable holding the platform API key
pub const API_KEY_ENV: &str = "TUBEPULSE_YOUTUBE_API_KEY";

/// Default base URL of the platform data API
pub const DEFAULT_API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Hard ceiling on parallel per-video workers
pub const MAX_CONCURRENT_VIDEOS_CEILING: usize = 5;

/// Bootstrap configuration loaded from TOML file
///
/// Every field is optional; anything missing falls back to
/// [`CompiledDefaults`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    /// Platform API key
    pub api_key: Option<String>,
    /// Base URL of the platform data API
    pub api_base_url: Option<String>,
    /// Path to the SQLite database file
    pub database_path: Option<PathBuf>,
    /// HTTP listen address (host:port)
    pub bind_address: Option<String>,
    /// Total timeout for a single remote request, in seconds
    pub request_timeout_secs: Option<u64>,
    /// Remote request quota
    pub requests_per_second: Option<u32>,
    /// Parallel per-video workers
    pub max_concurrent_videos: Option<usize>,
    /// Recent uploads fetched per ingestion
    pub video_limit: Option<u32>,
    /// Top-level comments fetched per video
    pub comment_limit: Option<u32>,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Values compiled into the binary
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub api_base_url: String,
    pub database_path: PathBuf,
    pub bind_address: String,
    pub request_timeout_secs: u64,
    pub requests_per_second: u32,
    pub max_concurrent_videos: usize,
    pub video_limit: u32,
    pub comment_limit: u32,
    pub log_level: String,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            database_path: default_data_folder().join("tubepulse.db"),
            bind_address: "127.0.0.1:5780".to_string(),
            request_timeout_secs: 10,
            requests_per_second: 10,
            max_concurrent_videos: 3,
            video_limit: 5,
            comment_limit: 5,
            log_level: default_log_level(),
        }
    }
}

/// Values supplied on the command line or through `TUBEPULSE_*` variables
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_key: Option<String>,
    pub api_base_url: Option<String>,
    pub database_path: Option<PathBuf>,
    pub bind_address: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub requests_per_second: Option<u32>,
    pub max_concurrent_videos: Option<usize>,
    pub video_limit: Option<u32>,
    pub comment_limit: Option<u32>,
    pub log_level: Option<String>,
}

/// Platform API credential
///
/// `Debug` and `Display` are redacted so the key cannot leak through logs.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        if !is_valid_key(&key) {
            return Err(Error::Config("API key is empty".to_string()));
        }
        Ok(Self(key.trim().to_string()))
    }

    /// Raw key for request construction only
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub api_key: ApiKey,
    pub api_base_url: String,
    pub database_path: PathBuf,
    pub bind_address: String,
    pub request_timeout: Duration,
    pub requests_per_second: u32,
    pub max_concurrent_videos: usize,
    pub video_limit: u32,
    pub comment_limit: u32,
    pub log_level: String,
}

impl ServiceConfig {
    /// Merge overrides, TOML and compiled defaults into one configuration
    pub fn resolve(overrides: ConfigOverrides, toml_config: TomlConfig) -> Result<Self> {
        let defaults = CompiledDefaults::for_current_platform();

        let api_key = resolve_api_key(
            overrides.api_key.as_deref(),
            std::env::var(API_KEY_ENV).ok().as_deref(),
            toml_config.api_key.as_deref(),
        )?;

        let requests_per_second = overrides
            .requests_per_second
            .or(toml_config.requests_per_second)
            .unwrap_or(defaults.requests_per_second);
        if requests_per_second == 0 {
            return Err(Error::Config(
                "requests_per_second must be at least 1".to_string(),
            ));
        }

        let request_timeout_secs = overrides
            .request_timeout_secs
            .or(toml_config.request_timeout_secs)
            .unwrap_or(defaults.request_timeout_secs);
        // A zero timeout would fail every remote call immediately
        if request_timeout_secs == 0 {
            return Err(Error::Config(
                "request_timeout_secs must be at least 1".to_string(),
            ));
        }

        let requested_workers = overrides
            .max_concurrent_videos
            .or(toml_config.max_concurrent_videos)
            .unwrap_or(defaults.max_concurrent_videos);
        let max_concurrent_videos = clamp_workers(requested_workers);
        if max_concurrent_videos != requested_workers {
            warn!(
                requested = requested_workers,
                applied = max_concurrent_videos,
                "max_concurrent_videos outside 1..={}, clamped",
                MAX_CONCURRENT_VIDEOS_CEILING
            );
        }

        Ok(Self {
            api_key,
            api_base_url: overrides
                .api_base_url
                .or(toml_config.api_base_url)
                .unwrap_or(defaults.api_base_url),
            database_path: overrides
                .database_path
                .or(toml_config.database_path)
                .unwrap_or(defaults.database_path),
            bind_address: overrides
                .bind_address
                .or(toml_config.bind_address)
                .unwrap_or(defaults.bind_address),
            request_timeout: Duration::from_secs(request_timeout_secs),
            requests_per_second,
            max_concurrent_videos,
            video_limit: overrides
                .video_limit
                .or(toml_config.video_limit)
                .unwrap_or(defaults.video_limit),
            comment_limit: overrides
                .comment_limit
                .or(toml_config.comment_limit)
                .unwrap_or(defaults.comment_limit),
            log_level: overrides
                .log_level
                .unwrap_or(toml_config.logging.level),
        })
    }
}

/// Keep the worker count within 1..=MAX_CONCURRENT_VIDEOS_CEILING
pub fn clamp_workers(requested: usize) -> usize {
    requested.clamp(1, MAX_CONCURRENT_VIDEOS_CEILING)
}

/// Resolve the platform API key
///
/// **Priority:** command line → environment → TOML
pub fn resolve_api_key(
    cli_key: Option<&str>,
    env_key: Option<&str>,
    toml_key: Option<&str>,
) -> Result<ApiKey> {
    let candidates = [
        ("command line", cli_key),
        ("environment", env_key),
        ("TOML", toml_key),
    ];

    let sources: Vec<&str> = candidates
        .iter()
        .filter(|(_, key)| key.map(is_valid_key).unwrap_or(false))
        .map(|(source, _)| *source)
        .collect();

    if sources.len() > 1 {
        warn!(
            "API key found in multiple sources: {}. Using {} (highest priority).",
            sources.join(", "),
            sources[0]
        );
    }

    for (source, key) in candidates {
        if let Some(key) = key.filter(|k| is_valid_key(k)) {
            info!("API key loaded from {}", source);
            return ApiKey::new(key);
        }
    }

    Err(Error::Config(format!(
        "API key not configured. Please configure using one of:\n\
         1. Command line: --api-key <key>\n\
         2. Environment: {}=<key>\n\
         3. TOML config: api_key = \"<key>\"",
        API_KEY_ENV
    )))
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// Load TOML configuration
///
/// An explicitly requested file must exist. The default location is optional:
/// when it is missing the compiled defaults apply.
pub fn load_toml_config(explicit_path: Option<&Path>) -> Result<TomlConfig> {
    let path = match explicit_path {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            Some(path) => {
                warn!(
                    "Config file not found at {}, using defaults",
                    path.display()
                );
                return Ok(TomlConfig::default());
            }
            None => {
                warn!("Could not determine config directory, using defaults");
                return Ok(TomlConfig::default());
            }
        },
    };

    let content = std::fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    let config = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;

    info!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Default configuration file path for the platform
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tubepulse").join("config.toml"))
}

/// OS-dependent default data folder
fn default_data_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("tubepulse"))
        .unwrap_or_else(|| PathBuf::from("./tubepulse_data"))
}

/// User-Agent sent with every outbound request
pub fn get_user_agent() -> String {
    format!("TubePulse/{}", env!("CARGO_PKG_VERSION"))
}
