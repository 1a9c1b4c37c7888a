//! Growth prediction and sentiment summary
//!
//! [`StoredInsights`] derives both from what is already in the database:
//! a linear subscriber trend from the stored channel row, and per-label
//! counts of stored comments.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use tubepulse_common::time::date_after;
use tubepulse_common::Result;

use crate::db::{channels, sentiments};
use crate::models::{GrowthPoint, SentimentSummary};

/// Days covered by a growth prediction
pub const DEFAULT_HORIZON_DAYS: u64 = 7;

/// Subscribers added per predicted day
pub const DEFAULT_DAILY_INCREASE: u64 = 150;

#[async_trait]
pub trait InsightsProvider: Send + Sync {
    /// Predicted subscriber counts, one point per day starting tomorrow
    async fn predict_growth(&self, channel_id: &str) -> Result<Vec<GrowthPoint>>;

    /// Stored comment counts per sentiment label
    async fn summarize_sentiment(&self, channel_id: &str) -> Result<SentimentSummary>;
}

/// [`InsightsProvider`] backed by the SQLite store
#[derive(Clone)]
pub struct StoredInsights {
    pool: SqlitePool,
    horizon_days: u64,
    daily_increase: u64,
}

impl StoredInsights {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            horizon_days: DEFAULT_HORIZON_DAYS,
            daily_increase: DEFAULT_DAILY_INCREASE,
        }
    }

    /// Linear trend from `base` over the horizon, starting the day after `today`
    fn project(&self, today: NaiveDate, base: u64) -> Vec<GrowthPoint> {
        (1..=self.horizon_days)
            .map(|day| GrowthPoint {
                date: date_after(today, day),
                predicted_count: base.saturating_add(self.daily_increase.saturating_mul(day)),
            })
            .collect()
    }
}

#[async_trait]
impl InsightsProvider for StoredInsights {
    async fn predict_growth(&self, channel_id: &str) -> Result<Vec<GrowthPoint>> {
        let base = channels::load_channel(&self.pool, channel_id)
            .await?
            .map(|channel| channel.details.subscriber_count)
            .unwrap_or(0);

        Ok(self.project(Utc::now().date_naive(), base))
    }

    async fn summarize_sentiment(&self, channel_id: &str) -> Result<SentimentSummary> {
        sentiments::count_sentiments_by_label(&self.pool, channel_id).await
    }
}
