//! Data models for tubepulse-ingest

pub mod channel;
pub mod dashboard;
pub mod video;

pub use channel::ChannelDetails;
pub use dashboard::{DashboardReport, GrowthPoint, SentimentSummary};
pub use video::{Comment, VideoStats};
