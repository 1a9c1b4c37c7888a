//! Database access for tubepulse-ingest
//!
//! SQLite through sqlx. The three tables hold one row per channel (upserted),
//! and append-only histories of video statistics and classified comments.

pub mod channels;
pub mod sentiments;
pub mod video_stats;

use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::path::Path;
use tubepulse_common::Result;

use crate::models::VideoStats;

pub use channels::Channel;
pub use sentiments::{SentimentRecord, StoredSentiment};
pub use video_stats::VideoStatSnapshot;

/// Initialize database connection pool
///
/// Creates the database file and tables when missing.
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // mode=rwc: read, write, create
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    tracing::debug!("Connecting to database: {}", db_url);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    init_tables(&pool).await?;

    Ok(pool)
}

/// Create the channels, video_stats and sentiments tables if they don't exist
pub async fn init_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS channels (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL DEFAULT '',
            thumbnail_url TEXT NOT NULL DEFAULT '',
            banner_url TEXT NOT NULL DEFAULT '',
            subscriber_count INTEGER NOT NULL DEFAULT 0,
            view_count INTEGER NOT NULL DEFAULT 0,
            video_count INTEGER NOT NULL DEFAULT 0,
            last_updated TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS video_stats (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            channel_id TEXT NOT NULL,
            video_id TEXT NOT NULL,
            title TEXT NOT NULL DEFAULT '',
            view_count INTEGER NOT NULL DEFAULT 0,
            like_count INTEGER NOT NULL DEFAULT 0,
            comment_count INTEGER NOT NULL DEFAULT 0,
            published_at TEXT NOT NULL DEFAULT ''
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sentiments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            channel_id TEXT NOT NULL,
            video_id TEXT NOT NULL,
            comment_id TEXT NOT NULL,
            comment_text TEXT NOT NULL,
            positive_score REAL NOT NULL,
            neutral_score REAL NOT NULL,
            negative_score REAL NOT NULL,
            compound_score REAL NOT NULL,
            sentiment TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_video_stats_channel ON video_stats(channel_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_sentiments_channel ON sentiments(channel_id)")
        .execute(pool)
        .await?;

    tracing::info!("Database tables initialized (channels, video_stats, sentiments)");

    Ok(())
}

/// SQLite stores counts as signed 64-bit integers
pub(crate) fn to_db_count(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

pub(crate) fn from_db_count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

/// Write side of the store used by the ingestion pipeline
///
/// Each call is a single statement and therefore atomic on its own; no
/// transaction spans several calls.
#[async_trait]
pub trait StorageGateway: Send + Sync {
    /// Insert the channel, or replace every mutable field of the existing row
    async fn upsert_channel(&self, channel: &Channel) -> Result<()>;

    /// Append one statistics snapshot, returning its surrogate ID
    async fn append_video_stat(&self, channel_id: &str, video: &VideoStats) -> Result<i64>;

    /// Append one classified comment, returning its surrogate ID
    async fn append_sentiment(&self, record: &SentimentRecord) -> Result<i64>;
}

/// [`StorageGateway`] over a shared SQLite pool
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StorageGateway for SqliteStore {
    async fn upsert_channel(&self, channel: &Channel) -> Result<()> {
        channels::upsert_channel(&self.pool, channel).await
    }

    async fn append_video_stat(&self, channel_id: &str, video: &VideoStats) -> Result<i64> {
        video_stats::append_video_stat(&self.pool, channel_id, video).await
    }

    async fn append_sentiment(&self, record: &SentimentRecord) -> Result<i64> {
        sentiments::append_sentiment(&self.pool, record).await
    }
}

/// Single-connection in-memory pool with tables created
///
/// Every connection to `sqlite::memory:` opens a separate database, so the
/// pool is capped at one connection.
pub async fn in_memory_pool() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    init_tables(&pool).await?;
    Ok(pool)
}
