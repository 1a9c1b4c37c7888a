//! tubepulse-ingest - Channel ingestion service
//!
//! Serves `POST /dashboard` (ingest a channel and return its dashboard) and
//! `GET /health` on the configured bind address (default 127.0.0.1:5780).

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter};
use tubepulse_common::config::{load_toml_config, ConfigOverrides, ServiceConfig};

use tubepulse_ingest::db::{init_database_pool, SqliteStore};
use tubepulse_ingest::services::sentiment::LEXICON_VERSION;
use tubepulse_ingest::services::{SentimentClassifier, StoredInsights, YouTubeClient};
use tubepulse_ingest::workflow::{IngestOrchestrator, OrchestratorConfig};
use tubepulse_ingest::AppState;

/// Command-line arguments for tubepulse-ingest
#[derive(Parser, Debug)]
#[command(name = "tubepulse-ingest")]
#[command(about = "Channel statistics and comment sentiment ingestion service")]
#[command(version)]
struct Args {
    /// TOML configuration file (default: <config dir>/tubepulse/config.toml)
    #[arg(short, long, env = "TUBEPULSE_CONFIG")]
    config: Option<PathBuf>,

    /// YouTube Data API key (also read from TUBEPULSE_YOUTUBE_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Base URL of the YouTube Data API
    #[arg(long, env = "TUBEPULSE_API_BASE_URL")]
    api_base_url: Option<String>,

    /// SQLite database file
    #[arg(short, long, env = "TUBEPULSE_DATABASE_PATH")]
    database_path: Option<PathBuf>,

    /// Listen address (host:port)
    #[arg(short, long, env = "TUBEPULSE_BIND_ADDRESS")]
    bind_address: Option<String>,

    /// Total timeout per remote request, in seconds
    #[arg(long, env = "TUBEPULSE_REQUEST_TIMEOUT_SECS")]
    request_timeout_secs: Option<u64>,

    /// Remote request quota
    #[arg(long, env = "TUBEPULSE_REQUESTS_PER_SECOND")]
    requests_per_second: Option<u32>,

    /// Videos processed concurrently (1-5)
    #[arg(long, env = "TUBEPULSE_MAX_CONCURRENT_VIDEOS")]
    max_concurrent_videos: Option<usize>,

    /// Recent uploads fetched per ingestion
    #[arg(long, env = "TUBEPULSE_VIDEO_LIMIT")]
    video_limit: Option<u32>,

    /// Top-level comments fetched per video
    #[arg(long, env = "TUBEPULSE_COMMENT_LIMIT")]
    comment_limit: Option<u32>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "TUBEPULSE_LOG_LEVEL")]
    log_level: Option<String>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            api_key: self.api_key.clone(),
            api_base_url: self.api_base_url.clone(),
            database_path: self.database_path.clone(),
            bind_address: self.bind_address.clone(),
            request_timeout_secs: self.request_timeout_secs,
            requests_per_second: self.requests_per_second,
            max_concurrent_videos: self.max_concurrent_videos,
            video_limit: self.video_limit,
            comment_limit: self.comment_limit,
            log_level: self.log_level.clone(),
        }
    }
}

fn filter_for_level(level: &str) -> EnvFilter {
    EnvFilter::new(format!("tubepulse_ingest={level},tower_http={level}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // RUST_LOG wins; otherwise --log-level, refined by the TOML level once loaded
    let env_filter = EnvFilter::try_from_default_env().ok();
    let from_env = env_filter.is_some();
    let initial_filter = env_filter
        .unwrap_or_else(|| filter_for_level(args.log_level.as_deref().unwrap_or("info")));
    let (filter_layer, filter_handle) = reload::Layer::new(initial_filter);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let toml_config =
        load_toml_config(args.config.as_deref()).context("Failed to load configuration file")?;

    if !from_env && args.log_level.is_none() {
        filter_handle
            .reload(filter_for_level(&toml_config.logging.level))
            .context("Failed to apply configured log level")?;
    }

    let config = ServiceConfig::resolve(args.overrides(), toml_config)
        .context("Failed to resolve configuration")?;

    info!("Starting tubepulse-ingest");
    info!("Version: {} ({})", env!("CARGO_PKG_VERSION"), env!("GIT_HASH"));
    info!("Built: {}", env!("BUILD_TIMESTAMP"));
    info!("Database: {}", config.database_path.display());
    info!(
        video_limit = config.video_limit,
        comment_limit = config.comment_limit,
        workers = config.max_concurrent_videos,
        requests_per_second = config.requests_per_second,
        "Ingestion limits"
    );
    info!("Sentiment lexicon: {}", LEXICON_VERSION);

    let db_pool = init_database_pool(&config.database_path)
        .await
        .context("Failed to open database")?;
    info!("Database connection established");

    let client = YouTubeClient::from_config(&config).context("Failed to build API client")?;
    let orchestrator = IngestOrchestrator::new(
        Arc::new(client),
        Arc::new(SqliteStore::new(db_pool.clone())),
        Arc::new(SentimentClassifier::new()),
        Arc::new(StoredInsights::new(db_pool.clone())),
        OrchestratorConfig::from(&config),
    );

    let state = AppState::new(db_pool, Arc::new(orchestrator));
    let shutdown = state.shutdown.clone();
    let app = tubepulse_ingest::build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_address))?;
    info!("Listening on http://{}", config.bind_address);
    info!("Health check: http://{}/health", config.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM, then cancel in-flight ingestion runs
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }

    shutdown.cancel();
}
