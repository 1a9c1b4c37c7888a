//! Per-video records returned by the remote API

use serde::{Deserialize, Serialize};

/// Statistics and snippet for one uploaded video
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoStats {
    /// Platform video ID
    pub id: String,
    pub title: String,
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    /// Publication date as `YYYY-MM-DD`, empty when the platform value was unparseable
    pub published_at: String,
}

/// Top-level comment thread
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Opaque thread ID
    pub id: String,
    /// Platform-rendered display text; may contain HTML entities
    pub text: String,
}
