//! Ingestion workflow
//!
//! # State progression
//! RESOLVE → FETCH_CHANNEL → PERSIST_CHANNEL → FETCH_UPLOADS →
//! PROCESS_VIDEOS → PERSIST_VIDEOS → AGGREGATE → COMPLETED

pub mod orchestrator;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use orchestrator::{IngestOrchestrator, OrchestratorConfig};

/// Stage of one ingestion run, recorded in logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IngestState {
    /// Identifier → canonical channel ID
    Resolving,
    FetchingChannel,
    PersistingChannel,
    /// Uploads playlist and recent video IDs
    FetchingUploads,
    /// Statistics, comments and classification per video
    ProcessingVideos,
    PersistingVideos,
    /// Growth prediction and sentiment summary
    Aggregating,
    Completed,
    /// Stopped by cancellation token
    Cancelled,
    Failed,
}

impl fmt::Display for IngestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IngestState::Resolving => "RESOLVING",
            IngestState::FetchingChannel => "FETCHING_CHANNEL",
            IngestState::PersistingChannel => "PERSISTING_CHANNEL",
            IngestState::FetchingUploads => "FETCHING_UPLOADS",
            IngestState::ProcessingVideos => "PROCESSING_VIDEOS",
            IngestState::PersistingVideos => "PERSISTING_VIDEOS",
            IngestState::Aggregating => "AGGREGATING",
            IngestState::Completed => "COMPLETED",
            IngestState::Cancelled => "CANCELLED",
            IngestState::Failed => "FAILED",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_serde_name() {
        let state = IngestState::FetchingUploads;
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, format!("\"{}\"", state));
    }
}
