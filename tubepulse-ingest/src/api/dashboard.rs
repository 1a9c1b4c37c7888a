//! POST /dashboard

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::Deserialize;

use crate::{
    error::{ApiResult, IngestError},
    models::DashboardReport,
    AppState,
};

/// POST /dashboard request
#[derive(Debug, Deserialize)]
pub struct DashboardRequest {
    /// Canonical channel ID (`UC...`) or legacy username
    #[serde(default)]
    pub channel_id: String,
}

/// POST /dashboard
///
/// Runs a full ingestion for the channel and returns the aggregated
/// dashboard. The run is cancelled if the client disconnects or the
/// service shuts down.
pub async fn generate_dashboard(
    State(state): State<AppState>,
    request: Result<Json<DashboardRequest>, JsonRejection>,
) -> ApiResult<Json<DashboardReport>> {
    // Malformed bodies get the same error envelope as every other failure
    let Json(request) = request?;

    let cancel_token = state.shutdown.child_token();
    // Dropping the handler future (client gone) cancels the run
    let _cancel_on_drop = cancel_token.clone().drop_guard();

    match state
        .orchestrator
        .generate_dashboard(&request.channel_id, &cancel_token)
        .await
    {
        Ok(report) => Ok(Json(report)),
        Err(e) => {
            if matches!(
                e,
                IngestError::UpstreamUnavailable(_) | IngestError::Storage(_)
            ) {
                *state.last_error.write().await = Some(e.to_string());
            }
            Err(e.into())
        }
    }
}

/// Build dashboard routes
pub fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/dashboard", post(generate_dashboard))
}
