use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::core::{ChannelRecord, TitleSource};
use crate::youtube::VideoId;

/// Identity of a card within one rendering of the list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CardKey {
    pub generation: u64,
    pub index: usize,
}

/// Data carried by a card's Play button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayAction {
    pub url: Option<String>,
    pub title: Option<String>,
}

/// Data carried by a card's Open-externally button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenAction {
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelCard {
    pub key: CardKey,
    pub title: String,
    pub description: String,
    pub thumbnail: Option<String>,
    pub video_id: Option<VideoId>,
    pub play: PlayAction,
    pub open: OpenAction,
}

impl ChannelCard {
    pub fn from_record(key: CardKey, record: &ChannelRecord) -> Self {
        let url = record.source_url().map(str::to_string);
        Self {
            key,
            title: record.display_title().to_string(),
            description: record.description.clone().unwrap_or_default(),
            thumbnail: record.thumbnail_url(),
            video_id: record.video_id(),
            play: PlayAction {
                url: url.clone(),
                title: record.known_title().map(str::to_string),
            },
            open: OpenAction { url },
        }
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
        self.play.title = Some(title.to_string());
    }
}

/// One card per record, in list order
pub fn render_cards(generation: u64, records: &[ChannelRecord]) -> Vec<ChannelCard> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| ChannelCard::from_record(CardKey { generation, index }, record))
        .collect()
}

/// A title resolved in the background for one card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleUpdate {
    pub key: CardKey,
    pub title: String,
}

/// The rendered channel list and its in-flight title lookups
#[derive(Debug, Default)]
pub struct ChannelList {
    generation: u64,
    cards: Vec<ChannelCard>,
    tasks: Vec<JoinHandle<()>>,
}

impl ChannelList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn cards(&self) -> &[ChannelCard] {
        &self.cards
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn get(&self, key: CardKey) -> Option<&ChannelCard> {
        if key.generation != self.generation {
            return None;
        }
        self.cards.get(key.index)
    }

    pub fn by_index(&self, index: usize) -> Option<&ChannelCard> {
        self.cards.get(index)
    }

    /// Render a new list. Title lookups for the previous one are aborted.
    pub fn replace(&mut self, records: &[ChannelRecord]) -> &[ChannelCard] {
        self.abort_title_refresh();
        self.generation += 1;
        self.cards = render_cards(self.generation, records);
        &self.cards
    }

    pub fn clear(&mut self) {
        self.abort_title_refresh();
        self.generation += 1;
        self.cards.clear();
    }

    /// Start one background lookup per card that has a URL. Must be called
    /// from within a tokio runtime.
    pub fn spawn_title_refresh(
        &mut self,
        source: Arc<dyn TitleSource>,
        sender: UnboundedSender<TitleUpdate>,
    ) {
        self.abort_title_refresh();
        for card in &self.cards {
            let Some(url) = card.open.url.clone() else {
                continue;
            };
            let key = card.key;
            let source = Arc::clone(&source);
            let sender = sender.clone();
            self.tasks.push(tokio::spawn(async move {
                match source.fetch_title(&url).await {
                    Ok(Some(title)) => {
                        if sender.send(TitleUpdate { key, title }).is_err() {
                            debug!("Title for {} arrived after the list went away", url);
                        }
                    }
                    Ok(None) => debug!("No title available for {}", url),
                    Err(e) => debug!("Title lookup failed for {}: {}", url, e),
                }
            }));
        }
    }

    pub fn abort_title_refresh(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }

    /// Apply a resolved title. Returns `false` when the card no longer exists.
    pub fn apply_title_update(&mut self, update: &TitleUpdate) -> bool {
        if update.key.generation != self.generation {
            debug!("Dropping title for stale card {:?}", update.key);
            return false;
        }
        match self.cards.get_mut(update.key.index) {
            Some(card) => {
                card.set_title(&update.title);
                true
            }
            None => false,
        }
    }
}

impl Drop for ChannelList {
    fn drop(&mut self) {
        self.abort_title_refresh();
    }
}
