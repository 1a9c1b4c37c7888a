//! Error types for tubepulse-ingest
//!
//! [`IngestError`] is the pipeline taxonomy; [`ApiError`] is what the HTTP
//! layer renders.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::services::youtube_client::YouTubeError;

/// Message shown when an identifier cannot be resolved to a channel
pub const CHANNEL_NOT_FOUND_MESSAGE: &str = "Channel not found. Please check the ID or username.";

/// Ingestion pipeline error
#[derive(Debug, Error)]
pub enum IngestError {
    /// Identifier was empty after trimming
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Identifier or channel absent upstream
    #[error("Channel not found: {0}")]
    NotFound(String),

    /// Remote API unreachable, non-2xx, timed out or returned a malformed payload
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Write or read against the store failed
    #[error("Storage error: {0}")]
    Storage(#[from] tubepulse_common::Error),

    /// Request cancelled before completion
    #[error("Ingestion cancelled")]
    Cancelled,
}

impl From<YouTubeError> for IngestError {
    fn from(err: YouTubeError) -> Self {
        match err {
            YouTubeError::NotFound(what) => IngestError::NotFound(what),
            other => IngestError::UpstreamUnavailable(other.to_string()),
        }
    }
}

impl From<sqlx::Error> for IngestError {
    fn from(err: sqlx::Error) -> Self {
        IngestError::Storage(tubepulse_common::Error::Database(err))
    }
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Remote API failure (502)
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Storage failure (500)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Request abandoned, usually during shutdown (503)
    #[error("Cancelled: {0}")]
    Cancelled(String),
}

impl From<IngestError> for ApiError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::InvalidInput(msg) => ApiError::BadRequest(msg),
            IngestError::NotFound(_) => ApiError::NotFound(CHANNEL_NOT_FOUND_MESSAGE.to_string()),
            IngestError::UpstreamUnavailable(msg) => ApiError::UpstreamUnavailable(msg),
            IngestError::Storage(e) => ApiError::Storage(e.to_string()),
            IngestError::Cancelled => ApiError::Cancelled("Ingestion cancelled".to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::UpstreamUnavailable(msg) => {
                (StatusCode::BAD_GATEWAY, "UPSTREAM_UNAVAILABLE", msg)
            }
            ApiError::Storage(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR", msg),
            ApiError::Cancelled(msg) => (StatusCode::SERVICE_UNAVAILABLE, "CANCELLED", msg),
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_user_message() {
        let api: ApiError = IngestError::NotFound("someone".to_string()).into();
        match api {
            ApiError::NotFound(msg) => assert_eq!(msg, CHANNEL_NOT_FOUND_MESSAGE),
            other => panic!("unexpected mapping: {:?}", other),
        }
    }

    #[test]
    fn test_youtube_errors_split_not_found_from_upstream() {
        let not_found: IngestError = YouTubeError::NotFound("channel x".to_string()).into();
        assert!(matches!(not_found, IngestError::NotFound(_)));

        let upstream: IngestError = YouTubeError::Timeout.into();
        assert!(matches!(upstream, IngestError::UpstreamUnavailable(_)));

        let status: IngestError = YouTubeError::ApiError(403, "quota".to_string()).into();
        assert!(matches!(status, IngestError::UpstreamUnavailable(_)));
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (ApiError::BadRequest(String::new()), StatusCode::BAD_REQUEST),
            (ApiError::NotFound(String::new()), StatusCode::NOT_FOUND),
            (ApiError::UpstreamUnavailable(String::new()), StatusCode::BAD_GATEWAY),
            (ApiError::Storage(String::new()), StatusCode::INTERNAL_SERVER_ERROR),
            (ApiError::Cancelled(String::new()), StatusCode::SERVICE_UNAVAILABLE),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
