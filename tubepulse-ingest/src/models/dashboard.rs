//! Aggregate result of one ingestion run

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ChannelDetails, VideoStats};

/// One predicted subscriber count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrowthPoint {
    /// `YYYY-MM-DD`
    pub date: String,
    pub predicted_count: u64,
}

/// Stored sentiment rows per label
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentSummary {
    pub positive: u64,
    pub neutral: u64,
    pub negative: u64,
}

impl SentimentSummary {
    pub fn total(&self) -> u64 {
        self.positive + self.neutral + self.negative
    }
}

/// Dashboard returned for "generate dashboard for channel X"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardReport {
    /// Identifies this run in logs
    pub run_id: Uuid,
    pub channel: ChannelDetails,
    /// Successfully processed videos, in upstream order
    pub videos: Vec<VideoStats>,
    pub predictions: Vec<GrowthPoint>,
    pub sentiment_summary: SentimentSummary,
    /// Video IDs listed in the uploads playlist
    pub videos_requested: usize,
    /// Videos dropped because their statistics could not be fetched
    pub videos_skipped: usize,
    /// Comments classified and stored during this run
    pub comments_classified: usize,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}
