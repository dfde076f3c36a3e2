pub mod channels;
pub mod config;
pub mod controller;
pub mod core;
pub mod download;
pub mod error;
pub mod player;
pub mod render;
pub mod view;
pub mod youtube;

#[cfg(test)]
mod test_utils;

pub use channels::{CardKey, ChannelCard, ChannelList, TitleUpdate};
pub use config::Config;
pub use controller::PlaybackController;
pub use crate::core::{Channel, ChannelRecord, PlaybackState, TitleSource};
pub use error::{LofiError, Result};
pub use player::{EmbedState, EmbedStrategy, MountToken, NoRichApi, RichPlayer, RichPlayerApi};
pub use view::PlayerView;
pub use youtube::{OEmbedTitleSource, VideoId, extract_video_id};
