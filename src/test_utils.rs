//! Fakes shared by the unit tests: a view that records what it was told, a
//! scriptable rich player API and a canned title source.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;

use crate::channels::{CardKey, ChannelCard};
use crate::core::TitleSource;
use crate::error::{LofiError, Result};
use crate::player::{ErrorPanel, MountPoint, MountToken, PlayerVars, RichPlayer, RichPlayerApi};
use crate::view::{NowPlayingText, PlayerView};
use crate::youtube::VideoId;

#[derive(Debug, Default)]
pub struct RecordingView {
    pub controls_enabled: bool,
    pub mute_label: String,
    pub now_playing: Option<NowPlayingText>,
    pub placeholder_shown: bool,
    pub rich_mounts: usize,
    pub frame_src: Option<String>,
    pub frame_loads: usize,
    pub error: Option<ErrorPanel>,
    pub opened: Vec<String>,
    pub cards: Vec<ChannelCard>,
    pub card_titles: HashMap<CardKey, String>,
    pub list_error: Option<String>,
}

impl PlayerView for RecordingView {
    fn set_controls_enabled(&mut self, enabled: bool) {
        self.controls_enabled = enabled;
    }

    fn set_mute_label(&mut self, label: &str) {
        self.mute_label = label.to_string();
    }

    fn set_now_playing(&mut self, text: &NowPlayingText) {
        self.now_playing = Some(text.clone());
    }

    fn show_placeholder(&mut self) {
        self.placeholder_shown = true;
        self.error = None;
        self.frame_src = None;
    }

    fn prepare_rich_mount(&mut self) -> MountPoint {
        self.placeholder_shown = false;
        self.error = None;
        self.frame_src = None;
        self.rich_mounts += 1;
        MountPoint("player".to_string())
    }

    fn show_frame(&mut self, src: &str) {
        self.placeholder_shown = false;
        self.error = None;
        self.frame_src = Some(src.to_string());
        self.frame_loads += 1;
    }

    fn clear_frame(&mut self) {
        self.frame_src = Some(String::new());
    }

    fn show_error(&mut self, panel: &ErrorPanel) {
        self.placeholder_shown = false;
        self.frame_src = None;
        self.error = Some(panel.clone());
    }

    fn open_external(&mut self, url: &str) {
        self.opened.push(url.to_string());
    }

    fn render_cards(&mut self, cards: &[ChannelCard]) {
        self.list_error = None;
        self.card_titles = cards.iter().map(|c| (c.key, c.title.clone())).collect();
        self.cards = cards.to_vec();
    }

    fn update_card_title(&mut self, key: CardKey, title: &str) {
        self.card_titles.insert(key, title.to_string());
    }

    fn show_list_error(&mut self, message: &str) {
        self.cards.clear();
        self.card_titles.clear();
        self.list_error = Some(message.to_string());
    }
}

#[derive(Debug, Default)]
struct FakeState {
    created: Vec<(MountToken, VideoId)>,
    vars: Vec<PlayerVars>,
    live: usize,
    destroyed: usize,
    commands: Vec<String>,
    fail_create: bool,
    fail_commands: bool,
}

/// Shared view into what the fake rich players did
#[derive(Debug, Clone, Default)]
pub struct FakeLog(Rc<RefCell<FakeState>>);

impl FakeLog {
    pub fn live_players(&self) -> usize {
        self.0.borrow().live
    }

    pub fn destroyed(&self) -> usize {
        self.0.borrow().destroyed
    }

    pub fn created(&self) -> Vec<(MountToken, VideoId)> {
        self.0.borrow().created.clone()
    }

    pub fn last_vars(&self) -> Option<PlayerVars> {
        self.0.borrow().vars.last().copied()
    }

    pub fn commands(&self) -> Vec<String> {
        self.0.borrow().commands.clone()
    }

    pub fn last_command(&self) -> Option<String> {
        self.0.borrow().commands.last().cloned()
    }

    pub fn fail_commands(&self, fail: bool) {
        self.0.borrow_mut().fail_commands = fail;
    }
}

#[derive(Debug)]
pub struct FakeRichApi {
    ready: bool,
    log: FakeLog,
}

impl FakeRichApi {
    pub fn ready() -> Self {
        Self {
            ready: true,
            log: FakeLog::default(),
        }
    }

    pub fn log(&self) -> FakeLog {
        self.log.clone()
    }

    pub fn fail_create(&self, fail: bool) {
        self.log.0.borrow_mut().fail_create = fail;
    }
}

impl RichPlayerApi for FakeRichApi {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn create(
        &mut self,
        _mount: &MountPoint,
        video_id: &VideoId,
        vars: &PlayerVars,
        token: MountToken,
    ) -> Result<Box<dyn RichPlayer>> {
        let mut state = self.log.0.borrow_mut();
        if state.fail_create {
            return Err(LofiError::RichPlayerUnavailable("scripted failure".to_string()));
        }
        state.created.push((token, video_id.clone()));
        state.vars.push(*vars);
        state.live += 1;
        Ok(Box::new(FakeRichPlayer {
            log: self.log.clone(),
            destroyed: false,
        }))
    }
}

struct FakeRichPlayer {
    log: FakeLog,
    destroyed: bool,
}

impl FakeRichPlayer {
    fn command(&mut self, name: &str) -> Result<()> {
        let mut state = self.log.0.borrow_mut();
        if state.fail_commands || self.destroyed {
            return Err(LofiError::PlayerCommandFailed(name.to_string()));
        }
        state.commands.push(name.to_string());
        Ok(())
    }
}

impl RichPlayer for FakeRichPlayer {
    fn play(&mut self) -> Result<()> {
        self.command("play")
    }

    fn pause(&mut self) -> Result<()> {
        self.command("pause")
    }

    fn mute(&mut self) -> Result<()> {
        self.command("mute")
    }

    fn unmute(&mut self) -> Result<()> {
        self.command("unmute")
    }

    fn destroy(&mut self) {
        if !self.destroyed {
            self.destroyed = true;
            let mut state = self.log.0.borrow_mut();
            state.live -= 1;
            state.destroyed += 1;
        }
    }
}

/// Title source answering from a fixed table; unknown URLs fail
#[derive(Debug, Clone, Default)]
pub struct FakeTitleSource {
    titles: HashMap<String, String>,
    delay: Option<Duration>,
}

impl FakeTitleSource {
    pub fn new<const N: usize>(titles: [(&str, &str); N]) -> Self {
        Self {
            titles: titles
                .into_iter()
                .map(|(u, t)| (u.to_string(), t.to_string()))
                .collect(),
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl TitleSource for FakeTitleSource {
    async fn fetch_title(&self, url: &str) -> Result<Option<String>> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match self.titles.get(url) {
            Some(title) => Ok(Some(title.clone())),
            None => Err(LofiError::HttpError {
                status: 404,
                url: url.to_string(),
            }),
        }
    }
}
