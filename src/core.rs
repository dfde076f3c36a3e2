use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::youtube::{VideoId, build_thumbnail_url, extract_video_id};

pub const DEFAULT_CHANNEL_TITLE: &str = "Live Stream";
pub const UNTITLED_CARD: &str = "Untitled";

/// One entry of the channel list document
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChannelRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<String>,
    #[serde(rename = "videoUrl", default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl ChannelRecord {
    /// Create a record with a primary url and title
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// Set description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set thumbnail URL
    pub fn with_thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.thumbnail = Some(thumbnail.into());
        self
    }

    /// Source URL: `url`, then `video`, then `videoUrl`
    pub fn source_url(&self) -> Option<&str> {
        [&self.url, &self.video, &self.video_url]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|s| !s.is_empty())
    }

    /// Best-known title as supplied by the list, if any
    pub fn known_title(&self) -> Option<&str> {
        [&self.title, &self.name]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|s| !s.is_empty())
    }

    pub fn display_title(&self) -> &str {
        self.known_title().unwrap_or(UNTITLED_CARD)
    }

    pub fn video_id(&self) -> Option<VideoId> {
        extract_video_id(self.source_url())
    }

    /// Explicit thumbnail, else the one derived from the video id
    pub fn thumbnail_url(&self) -> Option<String> {
        self.thumbnail
            .clone()
            .filter(|t| !t.is_empty())
            .or_else(|| self.video_id().map(|id| build_thumbnail_url(&id)))
    }
}

/// The selected channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub url: String,
    pub video_id: VideoId,
    pub title: Option<String>,
}

impl Channel {
    /// Resolve a channel from its source URL; `None` when no id can be found
    pub fn resolve(url: &str, title: Option<&str>) -> Option<Self> {
        let video_id = extract_video_id(Some(url))?;
        Some(Self {
            url: url.to_string(),
            video_id,
            title: title.filter(|t| !t.is_empty()).map(str::to_string),
        })
    }

    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(DEFAULT_CHANNEL_TITLE)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackState {
    pub is_playing: bool,
    pub is_muted: bool,
}

impl PlaybackState {
    pub fn new(is_muted: bool) -> Self {
        Self {
            is_playing: false,
            is_muted,
        }
    }
}

/// Trait for looking up an authoritative display title for a channel URL
#[async_trait::async_trait]
pub trait TitleSource: Send + Sync {
    /// `Ok(None)` when the service has no title for the URL
    async fn fetch_title(&self, url: &str) -> Result<Option<String>>;
}
