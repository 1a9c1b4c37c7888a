//! Classified comments (append-only)
//!
//! Re-ingesting a video appends its comments again; rows are not
//! deduplicated by comment ID.

use serde::Serialize;
use sqlx::{Row, SqlitePool};
use tubepulse_common::{Error, Result};

use crate::models::SentimentSummary;
use crate::services::sentiment::{SentimentLabel, SentimentScores};

/// Classified comment to be stored
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentRecord {
    pub channel_id: String,
    pub video_id: String,
    pub comment_id: String,
    pub comment_text: String,
    pub scores: SentimentScores,
}

/// Stored classified comment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredSentiment {
    pub id: i64,
    #[serde(flatten)]
    pub record: SentimentRecord,
}

pub async fn append_sentiment(pool: &SqlitePool, record: &SentimentRecord) -> Result<i64> {
    let scores = &record.scores;

    let result = sqlx::query(
        r#"
        INSERT INTO sentiments (
            channel_id, video_id, comment_id, comment_text,
            positive_score, neutral_score, negative_score, compound_score, sentiment
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&record.channel_id)
    .bind(&record.video_id)
    .bind(&record.comment_id)
    .bind(&record.comment_text)
    .bind(scores.positive)
    .bind(scores.neutral)
    .bind(scores.negative)
    .bind(scores.compound)
    .bind(scores.label.as_str())
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Stored comments for one video, oldest first
pub async fn load_sentiments_for_video(
    pool: &SqlitePool,
    video_id: &str,
) -> Result<Vec<StoredSentiment>> {
    let rows = sqlx::query(
        r#"
        SELECT id, channel_id, video_id, comment_id, comment_text,
               positive_score, neutral_score, negative_score, compound_score, sentiment
        FROM sentiments
        WHERE video_id = ?
        ORDER BY id
        "#,
    )
    .bind(video_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|row| {
            let label: String = row.get("sentiment");
            let label = SentimentLabel::parse(&label)
                .ok_or_else(|| Error::InvalidInput(format!("Unknown sentiment label: {}", label)))?;

            Ok(StoredSentiment {
                id: row.get("id"),
                record: SentimentRecord {
                    channel_id: row.get("channel_id"),
                    video_id: row.get("video_id"),
                    comment_id: row.get("comment_id"),
                    comment_text: row.get("comment_text"),
                    scores: SentimentScores {
                        positive: row.get("positive_score"),
                        neutral: row.get("neutral_score"),
                        negative: row.get("negative_score"),
                        compound: row.get("compound_score"),
                        label,
                    },
                },
            })
        })
        .collect()
}

/// Stored comment counts per label for a channel
pub async fn count_sentiments_by_label(
    pool: &SqlitePool,
    channel_id: &str,
) -> Result<SentimentSummary> {
    let rows: Vec<(String, i64)> = sqlx::query_as(
        r#"
        SELECT sentiment, COUNT(*)
        FROM sentiments
        WHERE channel_id = ?
        GROUP BY sentiment
        "#,
    )
    .bind(channel_id)
    .fetch_all(pool)
    .await?;

    let mut summary = SentimentSummary::default();
    for (label, count) in rows {
        let count = super::from_db_count(count);
        match SentimentLabel::parse(&label) {
            Some(SentimentLabel::Positive) => summary.positive = count,
            Some(SentimentLabel::Neutral) => summary.neutral = count,
            Some(SentimentLabel::Negative) => summary.negative = count,
            None => tracing::warn!(label = %label, "Ignoring unknown sentiment label"),
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::in_memory_pool;
    use crate::services::SentimentClassifier;

    fn record(classifier: &SentimentClassifier, video_id: &str, comment_id: &str, text: &str) -> SentimentRecord {
        SentimentRecord {
            channel_id: "UCa".to_string(),
            video_id: video_id.to_string(),
            comment_id: comment_id.to_string(),
            comment_text: text.to_string(),
            scores: classifier.classify(text),
        }
    }

    #[tokio::test]
    async fn test_append_and_load() {
        let pool = in_memory_pool().await.expect("Failed to create in-memory database");
        let classifier = SentimentClassifier::new();

        let stored = record(&classifier, "v1", "c1", "This is amazing, I love it!");
        append_sentiment(&pool, &stored).await.unwrap();

        let loaded = load_sentiments_for_video(&pool, "v1").await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].record, stored);
        assert_eq!(loaded[0].record.scores.label, SentimentLabel::Positive);
    }

    #[tokio::test]
    async fn test_same_comment_appended_twice() {
        let pool = in_memory_pool().await.unwrap();
        let classifier = SentimentClassifier::new();

        let stored = record(&classifier, "v1", "c1", "nice");
        append_sentiment(&pool, &stored).await.unwrap();
        append_sentiment(&pool, &stored).await.unwrap();

        assert_eq!(load_sentiments_for_video(&pool, "v1").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_count_by_label() {
        let pool = in_memory_pool().await.unwrap();
        let classifier = SentimentClassifier::new();

        for (i, text) in ["great video", "love it", "terrible", "uploaded today"]
            .iter()
            .enumerate()
        {
            append_sentiment(&pool, &record(&classifier, "v1", &format!("c{}", i), text))
                .await
                .unwrap();
        }

        let summary = count_sentiments_by_label(&pool, "UCa").await.unwrap();
        assert_eq!(summary, SentimentSummary { positive: 2, neutral: 1, negative: 1 });

        let empty = count_sentiments_by_label(&pool, "UCother").await.unwrap();
        assert_eq!(empty.total(), 0);
    }
}
