//! Ingestion orchestrator
//!
//! Runs one "generate dashboard" request end to end: resolve the identifier,
//! fetch and upsert the channel, then fetch statistics and comments for the
//! most recent uploads, classify comments, and append everything to the store.
//!
//! Per-video work runs through `buffered(n)`, so results come back in upload
//! order and the first fatal error drops every in-flight video future.

use chrono::Utc;
use futures::stream::{self, StreamExt};
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use tubepulse_common::config::{clamp_workers, ServiceConfig};
use uuid::Uuid;

use super::IngestState;
use crate::db::{Channel, SentimentRecord, StorageGateway};
use crate::error::IngestError;
use crate::models::{DashboardReport, VideoStats};
use crate::services::{resolve_channel_id, ChannelApi, InsightsProvider, SentimentClassifier};

/// Per-request limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrchestratorConfig {
    /// Recent uploads to process
    pub video_limit: u32,
    /// Top-level comments classified per video
    pub comment_limit: u32,
    /// Videos processed concurrently (1..=5)
    pub max_concurrent_videos: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            video_limit: 5,
            comment_limit: 5,
            max_concurrent_videos: 3,
        }
    }
}

impl From<&ServiceConfig> for OrchestratorConfig {
    fn from(config: &ServiceConfig) -> Self {
        Self {
            video_limit: config.video_limit,
            comment_limit: config.comment_limit,
            max_concurrent_videos: config.max_concurrent_videos,
        }
    }
}

/// Result of processing one video
enum VideoOutcome {
    Processed {
        stats: VideoStats,
        comments_classified: usize,
    },
    /// Statistics unavailable; nothing stored for this video
    Skipped,
}

/// Ingestion orchestrator service
pub struct IngestOrchestrator {
    api: Arc<dyn ChannelApi>,
    store: Arc<dyn StorageGateway>,
    classifier: Arc<SentimentClassifier>,
    insights: Arc<dyn InsightsProvider>,
    config: OrchestratorConfig,
}

impl IngestOrchestrator {
    pub fn new(
        api: Arc<dyn ChannelApi>,
        store: Arc<dyn StorageGateway>,
        classifier: Arc<SentimentClassifier>,
        insights: Arc<dyn InsightsProvider>,
        config: OrchestratorConfig,
    ) -> Self {
        let workers = clamp_workers(config.max_concurrent_videos);
        Self {
            api,
            store,
            classifier,
            insights,
            config: OrchestratorConfig {
                max_concurrent_videos: workers,
                ..config
            },
        }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Generate the dashboard for a channel ID or legacy username
    ///
    /// Respects `cancel_token`: once it fires, in-flight remote calls are
    /// abandoned, no further writes are issued and the run ends with
    /// [`IngestError::Cancelled`].
    pub async fn generate_dashboard(
        &self,
        identifier: &str,
        cancel_token: &CancellationToken,
    ) -> Result<DashboardReport, IngestError> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("ingest_run", run_id = %run_id);

        async {
            tracing::info!(identifier = %identifier.trim(), "Starting ingestion run");

            let result = self.execute(run_id, identifier, cancel_token).await;

            match &result {
                Ok(report) => tracing::info!(
                    state = %IngestState::Completed,
                    channel_id = %report.channel.id,
                    videos = report.videos.len(),
                    videos_skipped = report.videos_skipped,
                    comments_classified = report.comments_classified,
                    "Ingestion run completed"
                ),
                Err(IngestError::Cancelled) => {
                    tracing::info!(state = %IngestState::Cancelled, "Ingestion run cancelled")
                }
                Err(e) => tracing::warn!(
                    state = %IngestState::Failed,
                    error = %e,
                    "Ingestion run failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn execute(
        &self,
        run_id: Uuid,
        identifier: &str,
        cancel_token: &CancellationToken,
    ) -> Result<DashboardReport, IngestError> {
        let started_at = Utc::now();

        tracing::debug!(state = %IngestState::Resolving);
        let channel_id =
            until_cancelled(cancel_token, resolve_channel_id(self.api.as_ref(), identifier))
                .await??;

        tracing::debug!(state = %IngestState::FetchingChannel, channel_id = %channel_id);
        let details = until_cancelled(cancel_token, self.api.get_channel(&channel_id)).await??;

        tracing::debug!(state = %IngestState::PersistingChannel);
        ensure_active(cancel_token)?;
        self.store
            .upsert_channel(&Channel::refreshed(details.clone()))
            .await?;

        tracing::debug!(state = %IngestState::FetchingUploads);
        let video_ids = match self.fetch_upload_ids(&channel_id, cancel_token).await {
            Ok(ids) => ids,
            Err(IngestError::Cancelled) => return Err(IngestError::Cancelled),
            Err(e) => {
                tracing::warn!(
                    channel_id = %channel_id,
                    error = %e,
                    "Failed to list recent uploads, continuing without videos"
                );
                Vec::new()
            }
        };

        tracing::debug!(
            state = %IngestState::ProcessingVideos,
            videos = video_ids.len(),
            workers = self.config.max_concurrent_videos
        );
        let mut videos = Vec::with_capacity(video_ids.len());
        let mut videos_skipped = 0;
        let mut comments_classified = 0;

        let pending: Vec<_> = video_ids
            .iter()
            .map(|video_id| self.process_video(&channel_id, video_id, cancel_token))
            .collect();
        let mut outcomes = stream::iter(pending).buffered(self.config.max_concurrent_videos);

        while let Some(outcome) = outcomes.next().await {
            match outcome? {
                VideoOutcome::Processed {
                    stats,
                    comments_classified: classified,
                } => {
                    comments_classified += classified;
                    videos.push(stats);
                }
                VideoOutcome::Skipped => videos_skipped += 1,
            }
        }
        drop(outcomes);

        tracing::debug!(state = %IngestState::PersistingVideos, videos = videos.len());
        for video in &videos {
            ensure_active(cancel_token)?;
            self.store.append_video_stat(&channel_id, video).await?;
        }

        tracing::debug!(state = %IngestState::Aggregating);
        ensure_active(cancel_token)?;
        let predictions = self.insights.predict_growth(&channel_id).await?;
        let sentiment_summary = self.insights.summarize_sentiment(&channel_id).await?;

        Ok(DashboardReport {
            run_id,
            channel: details,
            videos,
            predictions,
            sentiment_summary,
            videos_requested: video_ids.len(),
            videos_skipped,
            comments_classified,
            started_at,
            completed_at: Utc::now(),
        })
    }

    async fn fetch_upload_ids(
        &self,
        channel_id: &str,
        cancel_token: &CancellationToken,
    ) -> Result<Vec<String>, IngestError> {
        let playlist_id =
            until_cancelled(cancel_token, self.api.get_uploads_playlist_id(channel_id)).await??;

        let ids = until_cancelled(
            cancel_token,
            self.api
                .list_recent_video_ids(&playlist_id, self.config.video_limit),
        )
        .await??;

        Ok(ids)
    }

    /// Fetch statistics, then classify and store the top comments
    ///
    /// Remote failures are logged and absorbed here. Storage failures and
    /// cancellation propagate.
    async fn process_video(
        &self,
        channel_id: &str,
        video_id: &str,
        cancel_token: &CancellationToken,
    ) -> Result<VideoOutcome, IngestError> {
        let stats = match until_cancelled(cancel_token, self.api.get_video_stats(video_id)).await? {
            Ok(stats) => stats,
            Err(e) => {
                tracing::warn!(
                    video_id = %video_id,
                    error = %e,
                    "Failed to fetch video statistics, skipping video"
                );
                return Ok(VideoOutcome::Skipped);
            }
        };

        let comments = match until_cancelled(
            cancel_token,
            self.api.get_top_comments(video_id, self.config.comment_limit),
        )
        .await?
        {
            Ok(comments) => comments,
            Err(e) => {
                tracing::warn!(
                    video_id = %video_id,
                    error = %e,
                    "Failed to fetch comments, keeping video without sentiment"
                );
                Vec::new()
            }
        };

        let mut comments_classified = 0;
        for comment in comments {
            let scores = self.classifier.classify(&comment.text);

            ensure_active(cancel_token)?;
            self.store
                .append_sentiment(&SentimentRecord {
                    channel_id: channel_id.to_string(),
                    video_id: video_id.to_string(),
                    comment_id: comment.id,
                    comment_text: comment.text,
                    scores,
                })
                .await?;
            comments_classified += 1;
        }

        tracing::debug!(
            video_id = %video_id,
            comments = comments_classified,
            "Video processed"
        );

        Ok(VideoOutcome::Processed {
            stats,
            comments_classified,
        })
    }
}

/// Race `future` against the token; the future is dropped on cancellation
async fn until_cancelled<F, T>(cancel_token: &CancellationToken, future: F) -> Result<T, IngestError>
where
    F: Future<Output = T>,
{
    tokio::select! {
        biased;
        _ = cancel_token.cancelled() => Err(IngestError::Cancelled),
        output = future => Ok(output),
    }
}

fn ensure_active(cancel_token: &CancellationToken) -> Result<(), IngestError> {
    if cancel_token.is_cancelled() {
        Err(IngestError::Cancelled)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let config = OrchestratorConfig::default();
        assert_eq!(config.video_limit, 5);
        assert_eq!(config.comment_limit, 5);
        assert_eq!(config.max_concurrent_videos, 3);
    }

    #[tokio::test]
    async fn test_until_cancelled_prefers_cancellation() {
        let token = CancellationToken::new();
        token.cancel();

        let result = until_cancelled(&token, async { 42 }).await;
        assert!(matches!(result, Err(IngestError::Cancelled)));
        assert!(ensure_active(&token).is_err());
    }

    // Handlers hand this future to axum, which needs it to be Send
    #[allow(dead_code)]
    fn dashboard_future_is_send(orchestrator: &IngestOrchestrator, token: &CancellationToken) {
        fn assert_send<T: Send>(_: T) {}
        assert_send(orchestrator.generate_dashboard("UC_x", token));
    }

    #[tokio::test]
    async fn test_until_cancelled_passes_output_through() {
        let token = CancellationToken::new();
        assert_eq!(until_cancelled(&token, async { 42 }).await.unwrap(), 42);
        assert!(ensure_active(&token).is_ok());
    }
}
