use std::fmt;

use crate::error::{LofiError, Result};
use crate::player::MountToken;
use crate::youtube::VideoId;

/// Element the rich widget is attached to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountPoint(pub String);

impl fmt::Display for MountPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Playback flags handed to the widget at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerVars {
    pub autoplay: bool,
    pub rel: u8,
    pub modestbranding: u8,
}

impl Default for PlayerVars {
    fn default() -> Self {
        Self {
            autoplay: true,
            rel: 0,
            modestbranding: 1,
        }
    }
}

/// Live control handle of a rich player instance.
///
/// Commands may fail when the widget has gone away underneath us; callers
/// treat a failure as a reason to fall back to the plain embed.
pub trait RichPlayer {
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self) -> Result<()>;
    fn mute(&mut self) -> Result<()>;
    fn unmute(&mut self) -> Result<()>;
    fn destroy(&mut self);
}

/// Entry point of the rich embedding widget.
///
/// The widget reports readiness and errors later; the embedder forwards those
/// to [`crate::PlaybackController::on_player_ready`] and
/// [`crate::PlaybackController::on_player_error`] with the token given here.
pub trait RichPlayerApi {
    /// Whether the external API has finished initializing
    fn is_ready(&self) -> bool;

    fn create(
        &mut self,
        mount: &MountPoint,
        video_id: &VideoId,
        vars: &PlayerVars,
        token: MountToken,
    ) -> Result<Box<dyn RichPlayer>>;
}

/// Rich API for hosts without an embedding widget; always falls back
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRichApi;

impl RichPlayerApi for NoRichApi {
    fn is_ready(&self) -> bool {
        false
    }

    fn create(
        &mut self,
        _mount: &MountPoint,
        _video_id: &VideoId,
        _vars: &PlayerVars,
        _token: MountToken,
    ) -> Result<Box<dyn RichPlayer>> {
        Err(LofiError::RichPlayerUnavailable(
            "no embedding widget on this host".to_string(),
        ))
    }
}
