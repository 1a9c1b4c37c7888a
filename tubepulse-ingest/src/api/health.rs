//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status ("ok", or "degraded" when the database is unreachable)
    pub status: String,
    /// Module name ("tubepulse-ingest")
    pub module: String,
    /// Crate version from Cargo.toml
    pub version: String,
    /// Short commit hash captured at build time
    pub git_hash: String,
    /// Seconds since service started
    pub uptime_seconds: u64,
    /// Last upstream or storage failure, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime = Utc::now().signed_duration_since(state.startup_time);
    let uptime_seconds = uptime.num_seconds().max(0) as u64;

    let status = match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => "ok",
        Err(e) => {
            tracing::warn!(error = %e, "Health check database query failed");
            "degraded"
        }
    };

    let last_error = state.last_error.read().await.clone();

    Json(HealthResponse {
        status: status.to_string(),
        module: "tubepulse-ingest".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        git_hash: env!("GIT_HASH").to_string(),
        uptime_seconds,
        last_error,
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
