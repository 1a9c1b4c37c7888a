//! Platform data API client
//!
//! Typed wrapper over the read-only endpoints the ingestion pipeline needs:
//! `channels`, `playlistItems`, `videos` and `commentThreads`.
//!
//! Every request waits on a shared rate limiter and carries the API key as a
//! query parameter. The key never appears in log fields or error messages.
//! No request is retried.

use async_trait::async_trait;
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use std::num::NonZeroU32;
use std::time::Duration;
use thiserror::Error;
use tubepulse_common::config::{ApiKey, ServiceConfig};

use crate::models::{ChannelDetails, Comment, VideoStats};

/// Longest error body excerpt kept in [`YouTubeError::ApiError`]
const MAX_ERROR_BODY: usize = 300;

/// Platform client errors
#[derive(Debug, Error)]
pub enum YouTubeError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timed out")]
    Timeout,

    /// The API answered with no matching item. An HTTP 404 is an `ApiError`.
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

impl YouTubeError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, YouTubeError::NotFound(_))
    }

    fn from_reqwest(err: reqwest::Error) -> Self {
        // The request URL carries the key, strip it before the error is rendered
        let err = err.without_url();
        if err.is_timeout() {
            YouTubeError::Timeout
        } else if err.is_decode() {
            YouTubeError::ParseError(err.to_string())
        } else {
            YouTubeError::NetworkError(err.to_string())
        }
    }
}

/// Remote operations used by the resolver and the orchestrator
#[async_trait]
pub trait ChannelApi: Send + Sync {
    /// Map a legacy username to its channel ID
    async fn lookup_channel_id_by_username(&self, username: &str) -> Result<String, YouTubeError>;

    /// Snippet, statistics and branding for one channel
    async fn get_channel(&self, channel_id: &str) -> Result<ChannelDetails, YouTubeError>;

    /// ID of the channel's uploads playlist
    async fn get_uploads_playlist_id(&self, channel_id: &str) -> Result<String, YouTubeError>;

    /// Up to `limit` video IDs from a playlist, in upstream order
    async fn list_recent_video_ids(
        &self,
        playlist_id: &str,
        limit: u32,
    ) -> Result<Vec<String>, YouTubeError>;

    /// Statistics and snippet for one video
    async fn get_video_stats(&self, video_id: &str) -> Result<VideoStats, YouTubeError>;

    /// Up to `limit` top-level comment threads for one video
    async fn get_top_comments(&self, video_id: &str, limit: u32)
        -> Result<Vec<Comment>, YouTubeError>;
}

// ============================================================================
// Wire format
// ============================================================================

/// Accepts counts encoded as decimal strings (platform default) or numbers
fn count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => s.trim().parse().unwrap_or(0),
        Some(serde_json::Value::Number(n)) => n.as_u64().unwrap_or(0),
        _ => 0,
    })
}

#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct ChannelIdItem {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ChannelItem {
    id: String,
    #[serde(default)]
    snippet: ChannelSnippet,
    #[serde(default)]
    statistics: ChannelStatistics,
    #[serde(rename = "brandingSettings", default)]
    branding_settings: BrandingSettings,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ChannelSnippet {
    title: String,
    description: String,
    thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Thumbnails {
    high: Option<Thumbnail>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Thumbnail {
    url: String,
}

#[derive(Debug, Default, Deserialize)]
struct ChannelStatistics {
    #[serde(rename = "subscriberCount", default, deserialize_with = "count")]
    subscriber_count: u64,
    #[serde(rename = "viewCount", default, deserialize_with = "count")]
    view_count: u64,
    #[serde(rename = "videoCount", default, deserialize_with = "count")]
    video_count: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BrandingSettings {
    image: BrandingImage,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BrandingImage {
    #[serde(rename = "bannerExternalUrl")]
    banner_external_url: Option<String>,
    #[serde(rename = "bannerTabletHdImageUrl")]
    banner_tablet_hd_image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentDetailsItem {
    #[serde(rename = "contentDetails", default)]
    content_details: ContentDetails,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ContentDetails {
    #[serde(rename = "relatedPlaylists")]
    related_playlists: RelatedPlaylists,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RelatedPlaylists {
    uploads: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaylistItem {
    #[serde(default)]
    snippet: PlaylistItemSnippet,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PlaylistItemSnippet {
    #[serde(rename = "resourceId")]
    resource_id: ResourceId,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ResourceId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    #[serde(default)]
    snippet: VideoSnippet,
    #[serde(default)]
    statistics: VideoStatistics,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct VideoSnippet {
    title: String,
    #[serde(rename = "publishedAt")]
    published_at: String,
}

#[derive(Debug, Default, Deserialize)]
struct VideoStatistics {
    #[serde(rename = "viewCount", default, deserialize_with = "count")]
    view_count: u64,
    #[serde(rename = "likeCount", default, deserialize_with = "count")]
    like_count: u64,
    #[serde(rename = "commentCount", default, deserialize_with = "count")]
    comment_count: u64,
}

#[derive(Debug, Deserialize)]
struct CommentThread {
    id: String,
    snippet: CommentThreadSnippet,
}

#[derive(Debug, Deserialize)]
struct CommentThreadSnippet {
    #[serde(rename = "topLevelComment")]
    top_level_comment: TopLevelComment,
}

#[derive(Debug, Deserialize)]
struct TopLevelComment {
    snippet: CommentSnippet,
}

#[derive(Debug, Deserialize)]
struct CommentSnippet {
    #[serde(rename = "textDisplay", default)]
    text_display: String,
}

impl ChannelItem {
    fn into_details(self) -> ChannelDetails {
        let image = self.branding_settings.image;
        let banner_url = image
            .banner_external_url
            .or(image.banner_tablet_hd_image_url)
            .unwrap_or_default();

        ChannelDetails {
            id: self.id,
            name: self.snippet.title,
            description: self.snippet.description,
            thumbnail_url: self
                .snippet
                .thumbnails
                .high
                .map(|t| t.url)
                .unwrap_or_default(),
            banner_url,
            subscriber_count: self.statistics.subscriber_count,
            view_count: self.statistics.view_count,
            video_count: self.statistics.video_count,
        }
    }
}

// ============================================================================
// Client
// ============================================================================

/// Connection settings for [`YouTubeClient`]
#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Total time allowed for one request
    pub request_timeout: Duration,
    /// Request quota shared by every caller of this client
    pub requests_per_second: u32,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            requests_per_second: 10,
        }
    }
}

/// Platform data API client
pub struct YouTubeClient {
    http_client: Client,
    base_url: String,
    api_key: ApiKey,
    rate_limiter: RateLimiter<
        governor::state::direct::NotKeyed,
        governor::state::InMemoryState,
        governor::clock::DefaultClock,
    >,
}

impl YouTubeClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: ApiKey,
        settings: ClientSettings,
    ) -> Result<Self, YouTubeError> {
        let http_client = Client::builder()
            .user_agent(tubepulse_common::config::get_user_agent())
            .timeout(settings.request_timeout)
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(YouTubeError::from_reqwest)?;

        let per_second = NonZeroU32::new(settings.requests_per_second).unwrap_or(NonZeroU32::MIN);

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            rate_limiter: RateLimiter::direct(Quota::per_second(per_second)),
        })
    }

    pub fn from_config(config: &ServiceConfig) -> Result<Self, YouTubeError> {
        Self::new(
            config.api_base_url.clone(),
            config.api_key.clone(),
            ClientSettings {
                request_timeout: config.request_timeout,
                requests_per_second: config.requests_per_second,
            },
        )
    }

    /// GET `{base_url}/{resource}` and decode the JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        resource: &str,
        params: &[(&str, &str)],
    ) -> Result<T, YouTubeError> {
        self.rate_limiter.until_ready().await;

        let url = format!("{}/{}", self.base_url, resource);
        tracing::debug!(resource = %resource, params = ?params, "Querying platform API");

        let response = self
            .http_client
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.expose())])
            .send()
            .await
            .map_err(YouTubeError::from_reqwest)?;

        let status = response.status();

        if !status.is_success() {
            let mut error_text = response.text().await.unwrap_or_default();
            if error_text.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !error_text.is_char_boundary(cut) {
                    cut -= 1;
                }
                error_text.truncate(cut);
            }
            tracing::warn!(
                resource = %resource,
                status = status.as_u16(),
                "Platform API returned error status"
            );
            return Err(YouTubeError::ApiError(status.as_u16(), error_text));
        }

        let body = response.text().await.map_err(YouTubeError::from_reqwest)?;
        serde_json::from_str(&body).map_err(|e| YouTubeError::ParseError(e.to_string()))
    }
}

#[async_trait]
impl ChannelApi for YouTubeClient {
    async fn lookup_channel_id_by_username(&self, username: &str) -> Result<String, YouTubeError> {
        let response: ListResponse<ChannelIdItem> = self
            .get_json("channels", &[("part", "id"), ("forUsername", username)])
            .await?;

        response
            .items
            .into_iter()
            .next()
            .map(|item| item.id)
            .ok_or_else(|| YouTubeError::NotFound(format!("username {}", username)))
    }

    async fn get_channel(&self, channel_id: &str) -> Result<ChannelDetails, YouTubeError> {
        let response: ListResponse<ChannelItem> = self
            .get_json(
                "channels",
                &[
                    ("part", "snippet,statistics,contentDetails,brandingSettings"),
                    ("id", channel_id),
                ],
            )
            .await?;

        let channel = response
            .items
            .into_iter()
            .next()
            .map(ChannelItem::into_details)
            .ok_or_else(|| YouTubeError::NotFound(format!("channel {}", channel_id)))?;

        tracing::info!(
            channel_id = %channel.id,
            name = %channel.name,
            subscribers = channel.subscriber_count,
            "Retrieved channel details"
        );

        Ok(channel)
    }

    async fn get_uploads_playlist_id(&self, channel_id: &str) -> Result<String, YouTubeError> {
        let response: ListResponse<ContentDetailsItem> = self
            .get_json("channels", &[("part", "contentDetails"), ("id", channel_id)])
            .await?;

        response
            .items
            .into_iter()
            .next()
            .and_then(|item| item.content_details.related_playlists.uploads)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| YouTubeError::NotFound(format!("uploads playlist for {}", channel_id)))
    }

    async fn list_recent_video_ids(
        &self,
        playlist_id: &str,
        limit: u32,
    ) -> Result<Vec<String>, YouTubeError> {
        let max_results = limit.to_string();
        let response: ListResponse<PlaylistItem> = self
            .get_json(
                "playlistItems",
                &[
                    ("part", "snippet"),
                    ("playlistId", playlist_id),
                    ("maxResults", &max_results),
                ],
            )
            .await?;

        Ok(response
            .items
            .into_iter()
            .filter_map(|item| item.snippet.resource_id.video_id)
            .filter(|id| !id.is_empty())
            .take(limit as usize)
            .collect())
    }

    async fn get_video_stats(&self, video_id: &str) -> Result<VideoStats, YouTubeError> {
        let response: ListResponse<VideoItem> = self
            .get_json("videos", &[("part", "statistics,snippet"), ("id", video_id)])
            .await?;

        let item = response
            .items
            .into_iter()
            .next()
            .ok_or_else(|| YouTubeError::NotFound(format!("video {}", video_id)))?;

        Ok(VideoStats {
            id: video_id.to_string(),
            title: item.snippet.title,
            view_count: item.statistics.view_count,
            like_count: item.statistics.like_count,
            comment_count: item.statistics.comment_count,
            published_at: tubepulse_common::time::published_date(&item.snippet.published_at),
        })
    }

    async fn get_top_comments(
        &self,
        video_id: &str,
        limit: u32,
    ) -> Result<Vec<Comment>, YouTubeError> {
        let max_results = limit.to_string();
        let response: ListResponse<CommentThread> = self
            .get_json(
                "commentThreads",
                &[
                    ("part", "snippet"),
                    ("videoId", video_id),
                    ("maxResults", &max_results),
                ],
            )
            .await?;

        Ok(response
            .items
            .into_iter()
            .take(limit as usize)
            .map(|thread| Comment {
                id: thread.id,
                text: thread.snippet.top_level_comment.snippet.text_display,
            })
            .collect())
    }
}
