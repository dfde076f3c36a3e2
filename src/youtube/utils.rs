use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Length of a YouTube video identifier
pub const VIDEO_ID_LEN: usize = 11;

pub const EMBED_BASE_URL: &str = "https://www.youtube.com/embed";

// Checked in order; the first capture wins.
static ID_PATTERNS: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    [
        r"v=([A-Za-z0-9_-]{11})",
        r"youtu\.be/([A-Za-z0-9_-]{11})",
        r"embed/([A-Za-z0-9_-]{11})",
        r"/live/([A-Za-z0-9_-]{11})",
    ]
    .map(|p| Regex::new(p).expect("video id pattern is valid"))
});

/// Normalized YouTube video identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VideoId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Extract the video identifier from a watch, short-link, embed or live URL.
///
/// When no known shape matches, the trailing eleven characters are taken as a
/// best-effort guess. Returns `None` for empty input or input too short to
/// hold an identifier.
pub fn extract_video_id(url: Option<&str>) -> Option<VideoId> {
    let url = url.filter(|u| !u.is_empty())?;

    for re in ID_PATTERNS.iter() {
        if let Some(m) = re.captures(url).and_then(|c| c.get(1)) {
            return Some(VideoId(m.as_str().to_string()));
        }
    }

    let len = url.chars().count();
    if len >= VIDEO_ID_LEN {
        let tail: String = url.chars().skip(len - VIDEO_ID_LEN).collect();
        return Some(VideoId(tail));
    }

    None
}

/// Construct the embed URL used by the fallback frame
pub fn build_embed_url(video_id: &VideoId, muted: bool) -> String {
    let mute_param = if muted { "&mute=1" } else { "" };
    format!(
        "{}/{}?autoplay=1&rel=0&modestbranding=1{}",
        EMBED_BASE_URL, video_id, mute_param
    )
}

/// Construct YouTube thumbnail URL from video ID
pub fn build_thumbnail_url(video_id: &VideoId) -> String {
    format!("https://img.youtube.com/vi/{}/mqdefault.jpg", video_id)
}
