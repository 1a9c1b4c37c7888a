//! Shared test doubles for tubepulse-ingest integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use sqlx::SqlitePool;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

use tubepulse_ingest::db::{
    in_memory_pool, Channel, SentimentRecord, SqliteStore, StorageGateway,
};
use tubepulse_ingest::models::{ChannelDetails, Comment, VideoStats};
use tubepulse_ingest::services::{ChannelApi, SentimentClassifier, StoredInsights, YouTubeError};
use tubepulse_ingest::workflow::{IngestOrchestrator, OrchestratorConfig};

/// In-memory [`ChannelApi`] with call counters and failure injection
#[derive(Default)]
pub struct FakeChannelApi {
    usernames: HashMap<String, String>,
    channels: HashMap<String, ChannelDetails>,
    uploads: HashMap<String, Vec<String>>,
    videos: HashMap<String, VideoStats>,
    comments: HashMap<String, Vec<Comment>>,
    failing_stats: HashSet<String>,
    failing_comments: HashSet<String>,
    failing_uploads: bool,
    failing_channel: bool,
    /// Replaces the subscriber count of every returned channel
    subscriber_override: Mutex<Option<u64>>,
    /// Token cancelled when the upload list is requested
    cancel_on_list: Mutex<Option<CancellationToken>>,
    pub lookup_calls: AtomicUsize,
    pub channel_calls: AtomicUsize,
    pub comment_calls: AtomicUsize,
}

impl FakeChannelApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Channel with `video_count` uploads `v1..vN`, each carrying one comment
    pub fn with_channel(channel_id: &str, subscribers: u64, video_count: usize) -> Self {
        let mut api = Self::new();
        api.channels.insert(
            channel_id.to_string(),
            ChannelDetails {
                id: channel_id.to_string(),
                name: "Test Channel".to_string(),
                description: "A channel used in tests".to_string(),
                thumbnail_url: "https://img.example/thumb.jpg".to_string(),
                banner_url: String::new(),
                subscriber_count: subscribers,
                view_count: 50_000,
                video_count: video_count as u64,
            },
        );

        let ids: Vec<String> = (1..=video_count).map(|i| format!("v{}", i)).collect();
        for (i, id) in ids.iter().enumerate() {
            api.videos.insert(
                id.clone(),
                VideoStats {
                    id: id.clone(),
                    title: format!("Video {}", i + 1),
                    view_count: 100 * (i as u64 + 1),
                    like_count: 10,
                    comment_count: 1,
                    published_at: "2024-05-01".to_string(),
                },
            );
            api.comments.insert(
                id.clone(),
                vec![Comment {
                    id: format!("c-{}", id),
                    text: "great video".to_string(),
                }],
            );
        }
        api.uploads.insert(channel_id.to_string(), ids);
        api
    }

    pub fn with_username(mut self, username: &str, channel_id: &str) -> Self {
        self.usernames
            .insert(username.to_string(), channel_id.to_string());
        self
    }

    pub fn with_comments(mut self, video_id: &str, comments: Vec<Comment>) -> Self {
        self.comments.insert(video_id.to_string(), comments);
        self
    }

    pub fn failing_stats_for(mut self, video_id: &str) -> Self {
        self.failing_stats.insert(video_id.to_string());
        self
    }

    pub fn failing_comments_for(mut self, video_id: &str) -> Self {
        self.failing_comments.insert(video_id.to_string());
        self
    }

    pub fn failing_uploads(mut self) -> Self {
        self.failing_uploads = true;
        self
    }

    /// Channel fetch fails with a 500, as when the API backend is down
    pub fn failing_channel(mut self) -> Self {
        self.failing_channel = true;
        self
    }

    /// Report a new subscriber count from now on
    pub fn set_subscribers(&self, subscribers: u64) {
        *self.subscriber_override.lock().unwrap() = Some(subscribers);
    }

    pub fn cancel_when_listing(self, token: CancellationToken) -> Self {
        *self.cancel_on_list.lock().unwrap() = Some(token);
        self
    }
}

fn playlist_for(channel_id: &str) -> String {
    format!("UU{}", channel_id.trim_start_matches("UC"))
}

#[async_trait]
impl ChannelApi for FakeChannelApi {
    async fn lookup_channel_id_by_username(&self, username: &str) -> Result<String, YouTubeError> {
        self.lookup_calls.fetch_add(1, Ordering::SeqCst);
        self.usernames
            .get(username)
            .cloned()
            .ok_or_else(|| YouTubeError::NotFound(format!("username {}", username)))
    }

    async fn get_channel(&self, channel_id: &str) -> Result<ChannelDetails, YouTubeError> {
        self.channel_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_channel {
            return Err(YouTubeError::ApiError(500, "backend error".to_string()));
        }
        let mut details = self
            .channels
            .get(channel_id)
            .cloned()
            .ok_or_else(|| YouTubeError::NotFound(format!("channel {}", channel_id)))?;
        if let Some(subscribers) = *self.subscriber_override.lock().unwrap() {
            details.subscriber_count = subscribers;
        }
        Ok(details)
    }

    async fn get_uploads_playlist_id(&self, channel_id: &str) -> Result<String, YouTubeError> {
        if self.failing_uploads {
            return Err(YouTubeError::ApiError(500, "backend error".to_string()));
        }
        Ok(playlist_for(channel_id))
    }

    async fn list_recent_video_ids(
        &self,
        playlist_id: &str,
        limit: u32,
    ) -> Result<Vec<String>, YouTubeError> {
        if let Some(token) = self.cancel_on_list.lock().unwrap().as_ref() {
            token.cancel();
        }
        Ok(self
            .uploads
            .iter()
            .find(|(channel_id, _)| playlist_for(channel_id) == playlist_id)
            .map(|(_, ids)| ids.iter().take(limit as usize).cloned().collect())
            .unwrap_or_default())
    }

    async fn get_video_stats(&self, video_id: &str) -> Result<VideoStats, YouTubeError> {
        if self.failing_stats.contains(video_id) {
            return Err(YouTubeError::Timeout);
        }
        self.videos
            .get(video_id)
            .cloned()
            .ok_or_else(|| YouTubeError::NotFound(format!("video {}", video_id)))
    }

    async fn get_top_comments(
        &self,
        video_id: &str,
        limit: u32,
    ) -> Result<Vec<Comment>, YouTubeError> {
        self.comment_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_comments.contains(video_id) {
            return Err(YouTubeError::ApiError(403, "commentsDisabled".to_string()));
        }
        Ok(self
            .comments
            .get(video_id)
            .map(|c| c.iter().take(limit as usize).cloned().collect())
            .unwrap_or_default())
    }
}

/// SQLite store whose comment writes always fail
pub struct FailingSentimentStore {
    inner: SqliteStore,
}

impl FailingSentimentStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            inner: SqliteStore::new(pool),
        }
    }
}

#[async_trait]
impl StorageGateway for FailingSentimentStore {
    async fn upsert_channel(&self, channel: &Channel) -> tubepulse_common::Result<()> {
        self.inner.upsert_channel(channel).await
    }

    async fn append_video_stat(
        &self,
        channel_id: &str,
        video: &VideoStats,
    ) -> tubepulse_common::Result<i64> {
        self.inner.append_video_stat(channel_id, video).await
    }

    async fn append_sentiment(&self, _record: &SentimentRecord) -> tubepulse_common::Result<i64> {
        Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full").into())
    }
}

/// Orchestrator over `api` and a fresh in-memory store
pub async fn orchestrator_with(
    api: Arc<FakeChannelApi>,
    config: OrchestratorConfig,
) -> (IngestOrchestrator, SqlitePool) {
    let pool = in_memory_pool()
        .await
        .expect("Failed to create in-memory database");
    let store = Arc::new(SqliteStore::new(pool.clone()));

    (orchestrator_over(api, store, &pool, config), pool)
}

/// Orchestrator over `api` and a caller-supplied store on `pool`
pub fn orchestrator_over(
    api: Arc<FakeChannelApi>,
    store: Arc<dyn StorageGateway>,
    pool: &SqlitePool,
    config: OrchestratorConfig,
) -> IngestOrchestrator {
    IngestOrchestrator::new(
        api,
        store,
        Arc::new(SentimentClassifier::new()),
        Arc::new(StoredInsights::new(pool.clone())),
        config,
    )
}

pub async fn count_rows(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(pool)
        .await
        .expect("Failed to count rows")
}
