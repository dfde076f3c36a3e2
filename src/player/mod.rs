use std::fmt;

use strum_macros::Display;
use tracing::{debug, info, warn};

use crate::view::PlayerView;
use crate::youtube::VideoId;

pub mod fallback;
pub mod rich;

pub use fallback::FallbackFrame;
pub use rich::{MountPoint, NoRichApi, PlayerVars, RichPlayer, RichPlayerApi};

/// Error codes meaning the owner has disabled embedding
pub const OWNER_RESTRICTED_CODES: [u16; 2] = [101, 150];

pub const OWNER_RESTRICTED_MESSAGE: &str =
    "This video can't be played here: the owner has disabled playback on other websites.";

/// How a player gets embedded
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[strum(serialize_all = "lowercase")]
pub enum EmbedStrategy {
    /// Script-driven widget with live controls and error callbacks
    Rich,
    /// Plain frame pointing at the embed URL
    Fallback,
}

impl EmbedStrategy {
    pub fn select(api_ready: bool) -> Self {
        if api_ready { Self::Rich } else { Self::Fallback }
    }

    pub fn demote(self) -> Self {
        Self::Fallback
    }
}

/// Identity of one mount; callbacks carrying an older token are ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct MountToken(u64);

impl MountToken {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for MountToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerErrorKind {
    OwnerRestricted(u16),
    Generic(u16),
}

impl PlayerErrorKind {
    pub fn from_code(code: u16) -> Self {
        if OWNER_RESTRICTED_CODES.contains(&code) {
            Self::OwnerRestricted(code)
        } else {
            Self::Generic(code)
        }
    }

    pub fn code(&self) -> u16 {
        match self {
            Self::OwnerRestricted(c) | Self::Generic(c) => *c,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::OwnerRestricted(_) => OWNER_RESTRICTED_MESSAGE.to_string(),
            Self::Generic(code) => format!("Player error (code {})", code),
        }
    }
}

/// What the player area shows after a playback error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorPanel {
    pub kind: PlayerErrorKind,
    pub message: String,
    /// Target of the "open externally" action
    pub external_url: String,
    /// Identifier the "retry" action remounts through the fallback
    pub video_id: VideoId,
}

impl ErrorPanel {
    pub fn new(code: u16, external_url: &str, video_id: VideoId) -> Self {
        let kind = PlayerErrorKind::from_code(code);
        Self {
            kind,
            message: kind.message(),
            external_url: external_url.to_string(),
            video_id,
        }
    }
}

pub struct RichMount {
    pub token: MountToken,
    pub video_id: VideoId,
    pub handle: Box<dyn RichPlayer>,
    pub ready: bool,
    /// Pause requested before the player was ready
    pub pause_pending: bool,
}

impl fmt::Debug for RichMount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RichMount")
            .field("token", &self.token)
            .field("video_id", &self.video_id)
            .field("ready", &self.ready)
            .field("pause_pending", &self.pause_pending)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
pub enum EmbedState {
    #[default]
    Unmounted,
    MountedRich(RichMount),
    MountedFallback(FallbackFrame),
    Errored(ErrorPanel),
}

impl EmbedState {
    pub fn strategy(&self) -> Option<EmbedStrategy> {
        match self {
            Self::MountedRich(_) => Some(EmbedStrategy::Rich),
            Self::MountedFallback(_) => Some(EmbedStrategy::Fallback),
            Self::Unmounted | Self::Errored(_) => None,
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.strategy().is_some()
    }
}

/// Result of applying the mute preference to the mounted player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MuteOutcome {
    /// Nothing mounted; only the preference changed
    Recorded,
    /// Rich player not ready yet; applied on the ready callback
    Deferred,
    /// Rich player handled it live
    Live,
    /// Fallback frame reloaded with the new flag
    Reloaded,
    /// Rich control failed; remounted as fallback
    Demoted,
}

/// Owner of the single mounted player
pub struct PlayerSlot<A: RichPlayerApi> {
    api: A,
    vars: PlayerVars,
    state: EmbedState,
    last_token: MountToken,
}

impl<A: RichPlayerApi> PlayerSlot<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            vars: PlayerVars::default(),
            state: EmbedState::Unmounted,
            last_token: MountToken::default(),
        }
    }

    pub fn state(&self) -> &EmbedState {
        &self.state
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn api_mut(&mut self) -> &mut A {
        &mut self.api
    }

    pub fn current_token(&self) -> Option<MountToken> {
        match &self.state {
            EmbedState::MountedRich(m) => Some(m.token),
            _ => None,
        }
    }

    /// Tear down whatever is mounted, then mount `video_id` with the best
    /// available strategy.
    pub fn mount<V: PlayerView>(&mut self, video_id: VideoId, muted: bool, view: &mut V) -> EmbedStrategy {
        self.teardown(view);

        if EmbedStrategy::select(self.api.is_ready()) == EmbedStrategy::Rich {
            let token = self.last_token.next();
            self.last_token = token;
            let mount_point = view.prepare_rich_mount();
            match self.api.create(&mount_point, &video_id, &self.vars, token) {
                Ok(handle) => {
                    info!("Mounted rich player {} for {} at {}", token, video_id, mount_point);
                    self.state = EmbedState::MountedRich(RichMount {
                        token,
                        video_id,
                        handle,
                        ready: false,
                        pause_pending: false,
                    });
                    return EmbedStrategy::Rich;
                }
                Err(e) => {
                    warn!("Rich player construction failed, using fallback embed: {}", e);
                }
            }
        }

        self.mount_fallback(video_id, muted, view);
        EmbedStrategy::Fallback
    }

    pub fn mount_fallback<V: PlayerView>(&mut self, video_id: VideoId, muted: bool, view: &mut V) {
        self.teardown(view);
        let frame = FallbackFrame::new(video_id, muted);
        let src = frame.src();
        info!("Mounted fallback embed {}", src);
        view.show_frame(&src);
        self.state = EmbedState::MountedFallback(frame);
    }

    /// Release the mounted player and drop any error panel. Safe to call
    /// repeatedly; returns whether a live player was released.
    pub fn teardown<V: PlayerView>(&mut self, view: &mut V) -> bool {
        match std::mem::take(&mut self.state) {
            EmbedState::MountedRich(mut m) => {
                debug!("Destroying rich player {}", m.token);
                m.handle.destroy();
                true
            }
            EmbedState::MountedFallback(_) => {
                view.clear_frame();
                true
            }
            EmbedState::Errored(_) | EmbedState::Unmounted => false,
        }
    }

    pub fn set_muted<V: PlayerView>(&mut self, muted: bool, view: &mut V) -> MuteOutcome {
        match &mut self.state {
            EmbedState::MountedRich(m) if !m.ready => MuteOutcome::Deferred,
            EmbedState::MountedRich(m) => {
                let res = if muted { m.handle.mute() } else { m.handle.unmute() };
                match res {
                    Ok(()) => MuteOutcome::Live,
                    Err(e) => {
                        warn!("Rich player mute control failed, reloading as fallback: {}", e);
                        let video_id = m.video_id.clone();
                        self.mount_fallback(video_id, muted, view);
                        MuteOutcome::Demoted
                    }
                }
            }
            EmbedState::MountedFallback(frame) => {
                let src = frame.set_muted(muted);
                view.show_frame(&src);
                MuteOutcome::Reloaded
            }
            EmbedState::Unmounted | EmbedState::Errored(_) => MuteOutcome::Recorded,
        }
    }

    /// Resume the rich player. `None` when no rich player is mounted.
    pub fn resume_rich<V: PlayerView>(&mut self, muted: bool, view: &mut V) -> Option<EmbedStrategy> {
        let EmbedState::MountedRich(m) = &mut self.state else {
            return None;
        };
        if !m.ready {
            m.pause_pending = false;
            return Some(EmbedStrategy::Rich);
        }
        match m.handle.play() {
            Ok(()) => Some(EmbedStrategy::Rich),
            Err(e) => {
                warn!("Rich player play failed, reloading as fallback: {}", e);
                let video_id = m.video_id.clone();
                self.mount_fallback(video_id, muted, view);
                Some(EmbedStrategy::Rich.demote())
            }
        }
    }

    /// Pause the rich player. `None` when no rich player is mounted.
    pub fn pause_rich<V: PlayerView>(&mut self, view: &mut V) -> Option<bool> {
        let EmbedState::MountedRich(m) = &mut self.state else {
            return None;
        };
        if !m.ready {
            debug!("Pause for {} deferred until ready", m.token);
            m.pause_pending = true;
            return Some(true);
        }
        match m.handle.pause() {
            Ok(()) => Some(true),
            Err(e) => {
                warn!("Rich player pause failed, tearing it down: {}", e);
                self.teardown(view);
                Some(false)
            }
        }
    }

    /// Ready callback. Applies the mute preference and any pause requested
    /// while loading; ignored for stale tokens. A failed control call reloads
    /// the video as a plain embed, or tears it down when it should be paused.
    pub fn on_ready<V: PlayerView>(&mut self, token: MountToken, muted: bool, view: &mut V) -> bool {
        let EmbedState::MountedRich(m) = &mut self.state else {
            debug!("Ignoring ready from {}: no rich player mounted", token);
            return false;
        };
        if m.token != token {
            debug!("Ignoring ready from stale player {} (current {})", token, m.token);
            return false;
        }
        m.ready = true;
        let paused = m.pause_pending;
        m.pause_pending = false;
        let res = if muted { m.handle.mute() } else { m.handle.unmute() };
        let res = res.and_then(|()| if paused { m.handle.pause() } else { Ok(()) });
        if let Err(e) = res {
            if paused {
                warn!("Rich player failed on ready while paused, tearing it down: {}", e);
                self.teardown(view);
            } else {
                warn!("Could not apply mute preference on ready, reloading as fallback: {}", e);
                let video_id = m.video_id.clone();
                self.mount_fallback(video_id, muted, view);
            }
        }
        true
    }

    /// Error callback. Destroys the rich player and moves to `Errored`.
    pub fn on_error(&mut self, token: MountToken, code: u16, external_url: &str) -> Option<&ErrorPanel> {
        match &self.state {
            EmbedState::MountedRich(m) if m.token == token => {}
            _ => {
                debug!("Ignoring error {} from stale player {}", code, token);
                return None;
            }
        }
        let EmbedState::MountedRich(mut m) = std::mem::take(&mut self.state) else {
            return None;
        };
        m.handle.destroy();
        let panel = ErrorPanel::new(code, external_url, m.video_id);
        warn!("Player {} reported error {}: {}", token, code, panel.message);
        self.state = EmbedState::Errored(panel);
        match &self.state {
            EmbedState::Errored(p) => Some(p),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{FakeRichApi, RecordingView};
    use crate::youtube::extract_video_id;

    fn vid(s: &str) -> VideoId {
        extract_video_id(Some(s)).unwrap()
    }

    #[test]
    fn test_strategy_select_and_demote() {
        assert_eq!(EmbedStrategy::select(true), EmbedStrategy::Rich);
        assert_eq!(EmbedStrategy::select(false), EmbedStrategy::Fallback);
        assert_eq!(EmbedStrategy::Rich.demote(), EmbedStrategy::Fallback);
        assert_eq!(EmbedStrategy::Fallback.demote(), EmbedStrategy::Fallback);
        assert_eq!(EmbedStrategy::Rich.to_string(), "rich");
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(PlayerErrorKind::from_code(150), PlayerErrorKind::OwnerRestricted(150));
        assert_eq!(PlayerErrorKind::from_code(101), PlayerErrorKind::OwnerRestricted(101));
        assert_eq!(PlayerErrorKind::from_code(5).message(), "Player error (code 5)");
        assert_ne!(
            PlayerErrorKind::from_code(150).message(),
            PlayerErrorKind::from_code(2).message()
        );
    }

    #[test]
    fn test_mount_uses_fallback_when_api_not_ready() {
        let mut view = RecordingView::default();
        let mut slot = PlayerSlot::new(NoRichApi);
        let strategy = slot.mount(vid("jfKfPfyJRdk"), false, &mut view);
        assert_eq!(strategy, EmbedStrategy::Fallback);
        assert_eq!(slot.state().strategy(), Some(EmbedStrategy::Fallback));
        assert!(view.frame_src.as_deref().unwrap().contains("embed/jfKfPfyJRdk?autoplay=1"));
    }

    #[test]
    fn test_mount_falls_back_when_construction_fails() {
        let mut view = RecordingView::default();
        let api = FakeRichApi::ready();
        api.fail_create(true);
        let mut slot = PlayerSlot::new(api);
        assert_eq!(slot.mount(vid("jfKfPfyJRdk"), true, &mut view), EmbedStrategy::Fallback);
        assert!(view.frame_src.as_deref().unwrap().ends_with("&mute=1"));
    }

    #[test]
    fn test_remount_destroys_previous_rich_player() {
        let mut view = RecordingView::default();
        let api = FakeRichApi::ready();
        let log = api.log();
        let mut slot = PlayerSlot::new(api);

        slot.mount(vid("aaaaaaaaaaa"), false, &mut view);
        slot.mount(vid("bbbbbbbbbbb"), false, &mut view);

        assert_eq!(log.live_players(), 1);
        assert_eq!(log.destroyed(), 1);
        assert!(slot.teardown(&mut view));
        assert!(!slot.teardown(&mut view));
        assert_eq!(log.live_players(), 0);
    }

    #[test]
    fn test_stale_callbacks_are_ignored() {
        let mut view = RecordingView::default();
        let mut slot = PlayerSlot::new(FakeRichApi::ready());

        slot.mount(vid("aaaaaaaaaaa"), false, &mut view);
        let first = slot.current_token().unwrap();
        slot.mount(vid("bbbbbbbbbbb"), false, &mut view);
        let second = slot.current_token().unwrap();

        assert!(!slot.on_ready(first, false, &mut view));
        assert!(slot.on_error(first, 150, "https://youtu.be/aaaaaaaaaaa").is_none());
        assert!(slot.on_ready(second, false, &mut view));
    }

    #[test]
    fn test_mute_deferred_until_ready() {
        let mut view = RecordingView::default();
        let api = FakeRichApi::ready();
        let log = api.log();
        let mut slot = PlayerSlot::new(api);
        slot.mount(vid("aaaaaaaaaaa"), false, &mut view);

        assert_eq!(slot.set_muted(true, &mut view), MuteOutcome::Deferred);
        let token = slot.current_token().unwrap();
        slot.on_ready(token, true, &mut view);
        assert_eq!(log.last_command().as_deref(), Some("mute"));

        assert_eq!(slot.set_muted(false, &mut view), MuteOutcome::Live);
        assert_eq!(log.last_command().as_deref(), Some("unmute"));
    }

    #[test]
    fn test_failed_mute_demotes_to_fallback() {
        let mut view = RecordingView::default();
        let api = FakeRichApi::ready();
        let log = api.log();
        let mut slot = PlayerSlot::new(api);
        slot.mount(vid("aaaaaaaaaaa"), false, &mut view);
        let token = slot.current_token().unwrap();
        slot.on_ready(token, false, &mut view);

        log.fail_commands(true);
        assert_eq!(slot.set_muted(true, &mut view), MuteOutcome::Demoted);
        assert_eq!(slot.state().strategy(), Some(EmbedStrategy::Fallback));
        assert!(view.frame_src.as_deref().unwrap().ends_with("&mute=1"));
        assert_eq!(log.live_players(), 0);
    }

    #[test]
    fn test_rich_mount_passes_player_vars() {
        let mut view = RecordingView::default();
        let api = FakeRichApi::ready();
        let log = api.log();
        let mut slot = PlayerSlot::new(api);
        slot.mount(vid("aaaaaaaaaaa"), false, &mut view);

        let vars = log.last_vars().unwrap();
        assert!(vars.autoplay);
        assert_eq!(vars.rel, 0);
        assert_eq!(vars.modestbranding, 1);
    }

    #[test]
    fn test_play_pause_before_ready_are_deferred() {
        let mut view = RecordingView::default();
        let api = FakeRichApi::ready();
        let log = api.log();
        let mut slot = PlayerSlot::new(api);
        slot.mount(vid("aaaaaaaaaaa"), false, &mut view);
        let token = slot.current_token().unwrap();

        assert_eq!(slot.pause_rich(&mut view), Some(true));
        assert_eq!(slot.resume_rich(false, &mut view), Some(EmbedStrategy::Rich));
        assert_eq!(slot.pause_rich(&mut view), Some(true));
        assert_eq!(log.last_command(), None);

        assert!(slot.on_ready(token, false, &mut view));
        assert_eq!(log.commands(), vec!["unmute".to_string(), "pause".to_string()]);
        assert_eq!(slot.state().strategy(), Some(EmbedStrategy::Rich));
    }

    #[test]
    fn test_failed_ready_with_pending_pause_tears_down() {
        let mut view = RecordingView::default();
        let api = FakeRichApi::ready();
        let log = api.log();
        let mut slot = PlayerSlot::new(api);
        slot.mount(vid("aaaaaaaaaaa"), false, &mut view);
        let token = slot.current_token().unwrap();
        slot.pause_rich(&mut view);

        log.fail_commands(true);
        assert!(slot.on_ready(token, true, &mut view));
        assert!(matches!(slot.state(), EmbedState::Unmounted));
        assert_eq!(log.live_players(), 0);
        assert_eq!(view.frame_loads, 0);
    }
}
