use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error, info};

use crate::channels::{CardKey, ChannelList, TitleUpdate};
use crate::core::{Channel, ChannelRecord, PlaybackState, TitleSource};
use crate::error::LofiError;
use crate::player::{EmbedState, EmbedStrategy, MountToken, MuteOutcome, PlayerSlot, RichPlayerApi};
use crate::view::{LIST_LOAD_FAILED, NowPlayingText, PlayerView, mute_label};

/// Owns the channel list, the current channel, the playback flags and the
/// single mounted player, and keeps the view in step with them.
pub struct PlaybackController<V: PlayerView, A: RichPlayerApi> {
    view: V,
    slot: PlayerSlot<A>,
    state: PlaybackState,
    channel: Option<Channel>,
    channels: ChannelList,
}

impl<V: PlayerView, A: RichPlayerApi> PlaybackController<V, A> {
    pub fn new(view: V, api: A, start_muted: bool) -> Self {
        let mut controller = Self {
            view,
            slot: PlayerSlot::new(api),
            state: PlaybackState::new(start_muted),
            channel: None,
            channels: ChannelList::new(),
        };
        controller.view.set_controls_enabled(false);
        controller.view.set_mute_label(mute_label(start_muted));
        controller.view.show_placeholder();
        controller.refresh_text();
        controller
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn rich_api(&self) -> &A {
        self.slot.api()
    }

    pub fn rich_api_mut(&mut self) -> &mut A {
        self.slot.api_mut()
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn channel(&self) -> Option<&Channel> {
        self.channel.as_ref()
    }

    pub fn channels(&self) -> &ChannelList {
        &self.channels
    }

    pub fn embed_state(&self) -> &EmbedState {
        self.slot.state()
    }

    /// Token of the mounted rich player, for routing its callbacks
    pub fn current_token(&self) -> Option<MountToken> {
        self.slot.current_token()
    }

    // ==================== channel list ====================

    pub fn show_channels(&mut self, records: &[ChannelRecord]) {
        let cards = self.channels.replace(records);
        info!("Rendering {} channel cards", cards.len());
        self.view.render_cards(cards);
    }

    pub fn show_list_error(&mut self, err: &LofiError) {
        error!("Failed to load channel list: {}", err);
        self.channels.clear();
        self.view.show_list_error(LIST_LOAD_FAILED);
    }

    pub fn refresh_titles(
        &mut self,
        source: Arc<dyn TitleSource>,
        sender: UnboundedSender<TitleUpdate>,
    ) {
        self.channels.spawn_title_refresh(source, sender);
    }

    /// Update a card with a resolved title. The now-playing channel keeps
    /// the title it was started with.
    pub fn apply_title_update(&mut self, update: TitleUpdate) -> bool {
        if !self.channels.apply_title_update(&update) {
            return false;
        }
        self.view.update_card_title(update.key, &update.title);
        true
    }

    pub fn play_card(&mut self, key: CardKey) -> bool {
        let Some(card) = self.channels.get(key) else {
            debug!("Ignoring play for unknown card {:?}", key);
            return false;
        };
        let action = card.play.clone();
        match action.url {
            Some(url) => self.play_channel(&url, action.title.as_deref()),
            None => {
                debug!("Ignoring play for card {:?}: no source url", key);
                false
            }
        }
    }

    pub fn open_card(&mut self, key: CardKey) -> bool {
        let Some(url) = self.channels.get(key).and_then(|c| c.open.url.clone()) else {
            return false;
        };
        self.view.open_external(&url);
        true
    }

    // ==================== playback ====================

    /// Start playing `url`. Silently ignored when no video id can be found.
    pub fn play_channel(&mut self, url: &str, title: Option<&str>) -> bool {
        let Some(channel) = Channel::resolve(url, title) else {
            debug!("Ignoring play request for {:?}: no video id", url);
            return false;
        };
        let video_id = channel.video_id.clone();
        self.channel = Some(channel);
        self.state.is_playing = true;
        self.view.set_controls_enabled(true);

        let strategy = self.slot.mount(video_id, self.state.is_muted, &mut self.view);
        info!("Playing {} via {} embed", url, strategy);

        self.refresh_text();
        self.view.set_mute_label(mute_label(self.state.is_muted));
        true
    }

    pub fn stop(&mut self) {
        self.slot.teardown(&mut self.view);
        self.state.is_playing = false;
        self.channel = None;
        self.view.show_placeholder();
        self.refresh_text();
        self.view.set_controls_enabled(false);
    }

    /// Play control: resumes the rich player in place, otherwise remounts
    /// the current channel.
    pub fn play(&mut self) -> bool {
        let Some(channel) = &self.channel else {
            return false;
        };
        let (url, title) = (channel.url.clone(), channel.title.clone());

        if let Some(strategy) = self.slot.resume_rich(self.state.is_muted, &mut self.view) {
            debug!("Resumed via {} embed", strategy);
            self.state.is_playing = true;
            return true;
        }
        if self.state.is_playing || matches!(self.slot.state(), EmbedState::Errored(_)) {
            return false;
        }
        self.play_channel(&url, title.as_deref())
    }

    /// Pause control: pauses the rich player in place; the plain embed has no
    /// pause, so it is torn down and the channel kept for a later Play.
    pub fn pause(&mut self) -> bool {
        match self.slot.pause_rich(&mut self.view) {
            Some(true) => {
                self.state.is_playing = false;
                true
            }
            Some(false) => {
                self.suspend();
                true
            }
            None if self.state.is_playing => {
                self.suspend();
                true
            }
            None => false,
        }
    }

    fn suspend(&mut self) {
        self.slot.teardown(&mut self.view);
        self.state.is_playing = false;
        self.view.show_placeholder();
    }

    pub fn toggle_mute(&mut self) -> MuteOutcome {
        self.state.is_muted = !self.state.is_muted;
        let outcome = if self.channel.is_some() {
            self.slot.set_muted(self.state.is_muted, &mut self.view)
        } else {
            MuteOutcome::Recorded
        };
        debug!("Mute set to {} ({:?})", self.state.is_muted, outcome);
        self.view.set_mute_label(mute_label(self.state.is_muted));
        outcome
    }

    /// Retry action of the error panel: remount the same video as a plain embed
    pub fn retry(&mut self) -> bool {
        let EmbedState::Errored(panel) = self.slot.state() else {
            return false;
        };
        let video_id = panel.video_id.clone();
        info!("Retrying {} with fallback embed", video_id);
        self.slot
            .mount_fallback(video_id, self.state.is_muted, &mut self.view);
        self.state.is_playing = true;
        self.view.set_controls_enabled(true);
        true
    }

    /// Open the errored video, or else the current channel, outside the player
    pub fn open_external(&mut self) -> bool {
        let url = match (self.slot.state(), &self.channel) {
            (EmbedState::Errored(panel), _) => panel.external_url.clone(),
            (_, Some(channel)) => channel.url.clone(),
            (_, None) => return false,
        };
        self.view.open_external(&url);
        true
    }

    // ==================== rich player callbacks ====================

    pub fn on_player_ready(&mut self, token: MountToken) -> bool {
        if !self.slot.on_ready(token, self.state.is_muted, &mut self.view) {
            return false;
        }
        if !self.slot.state().is_mounted() {
            self.view.show_placeholder();
        }
        true
    }

    pub fn on_player_error(&mut self, token: MountToken, code: u16) -> bool {
        let url = self
            .channel
            .as_ref()
            .map(|c| c.url.clone())
            .unwrap_or_default();
        let Some(panel) = self.slot.on_error(token, code, &url).cloned() else {
            return false;
        };
        self.state.is_playing = false;
        self.view.show_error(&panel);
        self.view.set_controls_enabled(false);
        true
    }

    pub fn strategy(&self) -> Option<EmbedStrategy> {
        self.slot.state().strategy()
    }

    fn refresh_text(&mut self) {
        self.view
            .set_now_playing(&NowPlayingText::from_channel(self.channel.as_ref()));
    }
}
