//! tubepulse-ingest library interface
//!
//! Channel ingestion pipeline: resolve a channel, fetch its statistics and
//! recent uploads from the YouTube Data API, classify top comments and
//! persist everything to SQLite. Exposed over HTTP by the binary.

pub mod api;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod workflow;

pub use crate::error::{ApiError, ApiResult, IngestError};

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use crate::workflow::IngestOrchestrator;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    pub orchestrator: Arc<IngestOrchestrator>,
    /// Cancelled on service shutdown; each request runs on a child token
    pub shutdown: CancellationToken,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Last error for diagnostic purposes
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(db: SqlitePool, orchestrator: Arc<IngestOrchestrator>) -> Self {
        Self {
            db,
            orchestrator,
            shutdown: CancellationToken::new(),
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::dashboard_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
