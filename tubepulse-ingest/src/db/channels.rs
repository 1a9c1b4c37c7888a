//! Channel database operations

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{Row, SqlitePool};
use tubepulse_common::Result;

use super::{from_db_count, to_db_count};
use crate::models::ChannelDetails;

/// Channel row: fetched details plus refresh time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Channel {
    #[serde(flatten)]
    pub details: ChannelDetails,
    pub last_updated: DateTime<Utc>,
}

impl Channel {
    /// Channel refreshed now
    pub fn refreshed(details: ChannelDetails) -> Self {
        Self {
            details,
            last_updated: Utc::now(),
        }
    }
}

/// Insert a channel or overwrite every mutable field of the existing row
pub async fn upsert_channel(pool: &SqlitePool, channel: &Channel) -> Result<()> {
    let details = &channel.details;

    sqlx::query(
        r#"
        INSERT INTO channels (
            id, name, description, thumbnail_url, banner_url,
            subscriber_count, view_count, video_count, last_updated
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            description = excluded.description,
            thumbnail_url = excluded.thumbnail_url,
            banner_url = excluded.banner_url,
            subscriber_count = excluded.subscriber_count,
            view_count = excluded.view_count,
            video_count = excluded.video_count,
            last_updated = excluded.last_updated
        "#,
    )
    .bind(&details.id)
    .bind(&details.name)
    .bind(&details.description)
    .bind(&details.thumbnail_url)
    .bind(&details.banner_url)
    .bind(to_db_count(details.subscriber_count))
    .bind(to_db_count(details.view_count))
    .bind(to_db_count(details.video_count))
    .bind(channel.last_updated)
    .execute(pool)
    .await?;

    Ok(())
}

/// Load channel by ID
pub async fn load_channel(pool: &SqlitePool, channel_id: &str) -> Result<Option<Channel>> {
    let row = sqlx::query(
        r#"
        SELECT id, name, description, thumbnail_url, banner_url,
               subscriber_count, view_count, video_count, last_updated
        FROM channels
        WHERE id = ?
        "#,
    )
    .bind(channel_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| Channel {
        details: ChannelDetails {
            id: row.get("id"),
            name: row.get("name"),
            description: row.get("description"),
            thumbnail_url: row.get("thumbnail_url"),
            banner_url: row.get("banner_url"),
            subscriber_count: from_db_count(row.get("subscriber_count")),
            view_count: from_db_count(row.get("view_count")),
            video_count: from_db_count(row.get("video_count")),
        },
        last_updated: row.get("last_updated"),
    }))
}

/// Number of channel rows
pub async fn count_channels(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM channels")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::in_memory_pool;

    fn details(subscribers: u64) -> ChannelDetails {
        ChannelDetails {
            id: "UC_test123".to_string(),
            name: "Test Channel".to_string(),
            description: "About".to_string(),
            thumbnail_url: "https://img/thumb".to_string(),
            banner_url: String::new(),
            subscriber_count: subscribers,
            view_count: 10,
            video_count: 2,
        }
    }

    #[tokio::test]
    async fn test_save_and_load_channel() {
        let pool = in_memory_pool().await.expect("Failed to create in-memory database");

        let channel = Channel::refreshed(details(1000));
        upsert_channel(&pool, &channel).await.expect("Failed to save channel");

        let loaded = load_channel(&pool, "UC_test123")
            .await
            .expect("Failed to load channel")
            .expect("Channel not found");

        assert_eq!(loaded.details, channel.details);
        assert_eq!(
            loaded.last_updated.timestamp_millis(),
            channel.last_updated.timestamp_millis()
        );
    }

    #[tokio::test]
    async fn test_upsert_overwrites_existing_row() {
        let pool = in_memory_pool().await.unwrap();

        upsert_channel(&pool, &Channel::refreshed(details(1000))).await.unwrap();

        let mut second = Channel::refreshed(details(2500));
        second.details.name = "Renamed".to_string();
        second.last_updated = second.last_updated + chrono::Duration::seconds(30);
        upsert_channel(&pool, &second).await.unwrap();

        assert_eq!(count_channels(&pool).await.unwrap(), 1);

        let loaded = load_channel(&pool, "UC_test123").await.unwrap().unwrap();
        assert_eq!(loaded.details.subscriber_count, 2500);
        assert_eq!(loaded.details.name, "Renamed");
        assert_eq!(
            loaded.last_updated.timestamp_millis(),
            second.last_updated.timestamp_millis()
        );
    }

    #[tokio::test]
    async fn test_load_missing_channel() {
        let pool = in_memory_pool().await.unwrap();
        assert!(load_channel(&pool, "UCnothing").await.unwrap().is_none());
    }
}
