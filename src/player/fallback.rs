use crate::youtube::{VideoId, build_embed_url};

/// Plain embed frame. It has no control channel, so every state change
/// means a new `src`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackFrame {
    video_id: VideoId,
    muted: bool,
}

impl FallbackFrame {
    pub fn new(video_id: VideoId, muted: bool) -> Self {
        Self { video_id, muted }
    }

    pub fn video_id(&self) -> &VideoId {
        &self.video_id
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn src(&self) -> String {
        build_embed_url(&self.video_id, self.muted)
    }

    /// Apply a mute flag and return the frame source to reload
    pub fn set_muted(&mut self, muted: bool) -> String {
        self.muted = muted;
        self.src()
    }
}
