//! Channel details as returned by the remote API

use serde::{Deserialize, Serialize};

/// Channel snapshot validated at the client boundary
///
/// Text fields default to an empty string and counts to 0 when the platform
/// omits them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelDetails {
    /// Canonical channel ID (`UC...`)
    pub id: String,
    /// Display name
    pub name: String,
    pub description: String,
    /// High-resolution avatar URL
    pub thumbnail_url: String,
    /// `bannerExternalUrl`, else `bannerTabletHdImageUrl`, else empty
    pub banner_url: String,
    pub subscriber_count: u64,
    pub view_count: u64,
    pub video_count: u64,
}
