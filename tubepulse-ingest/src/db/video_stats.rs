//! Video statistics snapshots (append-only)

use serde::Serialize;
use sqlx::{Row, SqlitePool};
use tubepulse_common::Result;

use super::{from_db_count, to_db_count};
use crate::models::VideoStats;

/// Stored snapshot of one video's statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoStatSnapshot {
    pub id: i64,
    pub channel_id: String,
    #[serde(flatten)]
    pub stats: VideoStats,
}

/// Append one snapshot; repeated snapshots of a video are kept as history
pub async fn append_video_stat(
    pool: &SqlitePool,
    channel_id: &str,
    video: &VideoStats,
) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO video_stats (
            channel_id, video_id, title, view_count, like_count, comment_count, published_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(channel_id)
    .bind(&video.id)
    .bind(&video.title)
    .bind(to_db_count(video.view_count))
    .bind(to_db_count(video.like_count))
    .bind(to_db_count(video.comment_count))
    .bind(&video.published_at)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// All snapshots for a channel, oldest first
pub async fn load_video_stats(pool: &SqlitePool, channel_id: &str) -> Result<Vec<VideoStatSnapshot>> {
    let rows = sqlx::query(
        r#"
        SELECT id, channel_id, video_id, title, view_count, like_count, comment_count, published_at
        FROM video_stats
        WHERE channel_id = ?
        ORDER BY id
        "#,
    )
    .bind(channel_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| VideoStatSnapshot {
            id: row.get("id"),
            channel_id: row.get("channel_id"),
            stats: VideoStats {
                id: row.get("video_id"),
                title: row.get("title"),
                view_count: from_db_count(row.get("view_count")),
                like_count: from_db_count(row.get("like_count")),
                comment_count: from_db_count(row.get("comment_count")),
                published_at: row.get("published_at"),
            },
        })
        .collect())
}
