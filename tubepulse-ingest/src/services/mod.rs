//! Services for tubepulse-ingest

pub mod insights;
pub mod resolver;
pub mod sentiment;
pub mod youtube_client;

pub use insights::{InsightsProvider, StoredInsights};
pub use resolver::resolve_channel_id;
pub use sentiment::{SentimentClassifier, SentimentLabel, SentimentScores};
pub use youtube_client::{ChannelApi, ClientSettings, YouTubeClient, YouTubeError};
