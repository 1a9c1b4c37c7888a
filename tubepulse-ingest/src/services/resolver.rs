//! Channel identifier resolution
//!
//! Canonical IDs pass through untouched; anything else is treated as a legacy
//! username and looked up once. No retries.

use crate::error::IngestError;
use crate::services::youtube_client::{ChannelApi, YouTubeError};

/// Prefix shared by every canonical channel ID
pub const CANONICAL_ID_PREFIX: &str = "UC";

/// True when `identifier` already has the canonical channel ID shape
pub fn is_canonical_id(identifier: &str) -> bool {
    identifier.starts_with(CANONICAL_ID_PREFIX)
}

/// Resolve a free-text identifier to a canonical channel ID
pub async fn resolve_channel_id(
    api: &dyn ChannelApi,
    identifier: &str,
) -> Result<String, IngestError> {
    let identifier = identifier.trim();

    if identifier.is_empty() {
        return Err(IngestError::InvalidInput(
            "Please enter a channel ID or username".to_string(),
        ));
    }

    if is_canonical_id(identifier) {
        tracing::debug!(channel_id = %identifier, "Identifier already canonical");
        return Ok(identifier.to_string());
    }

    match api.lookup_channel_id_by_username(identifier).await {
        Ok(channel_id) => {
            tracing::info!(username = %identifier, channel_id = %channel_id, "Resolved username");
            Ok(channel_id)
        }
        Err(YouTubeError::NotFound(_)) => {
            tracing::info!(username = %identifier, "No channel matches username");
            Err(IngestError::NotFound(identifier.to_string()))
        }
        Err(e) => {
            tracing::warn!(username = %identifier, error = %e, "Username lookup failed");
            Err(IngestError::UpstreamUnavailable(e.to_string()))
        }
    }
}
