use crate::channels::{CardKey, ChannelCard};
use crate::core::Channel;
use crate::player::{ErrorPanel, MountPoint};

pub const PLACEHOLDER_TITLE: &str = "Select a channel";
pub const PLACEHOLDER_DESCRIPTION: &str = "Click a channel to start listening.";
pub const NOTHING_PLAYING: &str = "Nothing playing";
pub const PLACEHOLDER_TEXT: &str = "Select a channel to play";
pub const LIST_LOAD_FAILED: &str = "Failed to load channels.";

pub fn mute_label(muted: bool) -> &'static str {
    if muted { "Muted" } else { "Unmuted" }
}

/// Text fields derived from the current channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NowPlayingText {
    pub title: String,
    pub description: String,
    pub now_playing: String,
}

impl NowPlayingText {
    pub fn from_channel(channel: Option<&Channel>) -> Self {
        match channel {
            Some(ch) => Self {
                title: ch.display_title().to_string(),
                description: String::new(),
                now_playing: ch.url.clone(),
            },
            None => Self::default(),
        }
    }
}

impl Default for NowPlayingText {
    fn default() -> Self {
        Self {
            title: PLACEHOLDER_TITLE.to_string(),
            description: PLACEHOLDER_DESCRIPTION.to_string(),
            now_playing: NOTHING_PLAYING.to_string(),
        }
    }
}

/// UI surface the controller drives. Injected at construction; the
/// controller never looks anything up on its own.
pub trait PlayerView {
    /// Play, Pause and Mute together
    fn set_controls_enabled(&mut self, enabled: bool);

    fn set_mute_label(&mut self, label: &str);

    fn set_now_playing(&mut self, text: &NowPlayingText);

    fn show_placeholder(&mut self);

    /// Clear the player area and hand back the element a rich player attaches to
    fn prepare_rich_mount(&mut self) -> MountPoint;

    /// Show (or reload) the fallback frame
    fn show_frame(&mut self, src: &str);

    /// Blank the fallback frame's source
    fn clear_frame(&mut self);

    fn show_error(&mut self, panel: &ErrorPanel);

    fn open_external(&mut self, url: &str);

    fn render_cards(&mut self, cards: &[ChannelCard]);

    fn update_card_title(&mut self, key: CardKey, title: &str);

    fn show_list_error(&mut self, message: &str);
}
