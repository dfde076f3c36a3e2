use clap::Parser;
use lofi_player::channels::{CardKey, ChannelCard};
use lofi_player::download::{build_http_client, load_channel_list};
use lofi_player::player::{ErrorPanel, MountPoint};
use lofi_player::render::{error_html, frame_html, list_html, placeholder_html};
use lofi_player::view::{NowPlayingText, PLACEHOLDER_TEXT, PlayerView};
use lofi_player::{Config, NoRichApi, OEmbedTitleSource, PlaybackController};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use strum_macros::EnumString;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "lofi",
    about = "Browse and play lofi channels",
    long_about = "Loads a channel list, shows it as cards and drives an embedded player.\n\
    The player runs as a plain embed; its URL is printed for a browser or webview.\n\n\
    Examples:\n\
      lofi                                   # Use the configured channel list\n\
      lofi data/channels.json                # Load a local list\n\
      lofi https://example.com/channels.json # Load a remote list\n\
      lofi --play 1 --muted                  # Start the first channel muted\n\
      lofi --html                            # Print markup instead of text"
)]
struct Args {
    /// Channel list path or URL
    #[arg(help = "Channel list path or http(s) URL (overrides the config file)")]
    source: Option<String>,

    /// Config file path
    #[arg(short = 'c', long = "config", help = "Config file path")]
    config: Option<PathBuf>,

    /// Start muted
    #[arg(short = 'm', long = "muted", help = "Start with sound muted")]
    muted: bool,

    /// Skip the background title lookups
    #[arg(long = "no-titles", help = "Do not look up channel titles")]
    no_titles: bool,

    /// Render cards and the player area as HTML markup
    #[arg(long = "html", help = "Print HTML markup instead of plain text")]
    html: bool,

    /// Play the N-th channel (1-based) right after loading
    #[arg(short = 'p', long = "play", help = "Play the N-th channel after loading")]
    play: Option<usize>,

    /// Verbose logging
    #[arg(short = 'v', long = "verbose", help = "Enable debug logging")]
    verbose: bool,
}

struct TerminalView {
    html: bool,
    controls_enabled: bool,
    mute_label: String,
}

impl TerminalView {
    fn new(html: bool) -> Self {
        Self {
            html,
            controls_enabled: false,
            mute_label: String::new(),
        }
    }

    fn status(&self) -> String {
        format!(
            "controls: {}, sound: {}",
            if self.controls_enabled { "enabled" } else { "disabled" },
            self.mute_label
        )
    }
}

impl PlayerView for TerminalView {
    fn set_controls_enabled(&mut self, enabled: bool) {
        self.controls_enabled = enabled;
    }

    fn set_mute_label(&mut self, label: &str) {
        self.mute_label = label.to_string();
    }

    fn set_now_playing(&mut self, text: &NowPlayingText) {
        println!("♪ {} | {}", text.title, text.now_playing);
        if !text.description.is_empty() {
            println!("  {}", text.description);
        }
    }

    fn show_placeholder(&mut self) {
        if self.html {
            println!("{}", placeholder_html());
        } else {
            println!("{}", PLACEHOLDER_TEXT);
        }
    }

    fn prepare_rich_mount(&mut self) -> MountPoint {
        MountPoint("player-wrap".to_string())
    }

    fn show_frame(&mut self, src: &str) {
        if self.html {
            println!("{}", frame_html(src));
        } else {
            println!("Embed: {}", src);
        }
    }

    fn clear_frame(&mut self) {
        debug!("Embed cleared");
    }

    fn show_error(&mut self, panel: &ErrorPanel) {
        if self.html {
            println!("{}", error_html(panel));
        } else {
            println!("✗ {}", panel.message);
            println!("  'open' to watch at {}, 'retry' to use the plain embed", panel.external_url);
        }
    }

    fn open_external(&mut self, url: &str) {
        println!("Open in your browser: {}", url);
    }

    fn render_cards(&mut self, cards: &[ChannelCard]) {
        if self.html {
            println!("{}", list_html(cards));
            return;
        }
        println!("Found {} channel(s):", cards.len());
        for card in cards {
            println!("[{}] {}", card.key.index + 1, card.title);
            if !card.description.is_empty() {
                println!("    {}", card.description);
            }
            match &card.video_id {
                Some(id) => println!("    id: {}", id),
                None => println!("    (no playable video)"),
            }
        }
    }

    fn update_card_title(&mut self, key: CardKey, title: &str) {
        println!("[{}] {}", key.index + 1, title);
    }

    fn show_list_error(&mut self, message: &str) {
        println!("{}", message);
    }
}

#[derive(EnumString, Debug, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
enum Verb {
    List,
    Play,
    Pause,
    Mute,
    Stop,
    Retry,
    Open,
    Status,
    Help,
    #[strum(serialize = "quit", serialize = "exit", serialize = "q")]
    Quit,
}

const HELP: &str = "Commands:
  list        show the channel list
  play [N]    play channel N, or resume the current one
  pause       pause playback
  mute        toggle mute
  stop        stop playback
  retry       retry a failed channel with the plain embed
  open [N]    open channel N (or the current one) outside the player
  status      show control state
  quit        exit";

type Controller = PlaybackController<TerminalView, NoRichApi>;

fn card_key(controller: &Controller, n: usize) -> Option<CardKey> {
    n.checked_sub(1)
        .and_then(|i| controller.channels().by_index(i))
        .map(|c| c.key)
}

/// Handle one input line; returns `false` to exit
fn handle_line(controller: &mut Controller, line: &str) -> bool {
    let mut parts = line.split_whitespace();
    let Some(word) = parts.next() else {
        return true;
    };
    let Ok(verb) = Verb::from_str(&word.to_lowercase()) else {
        println!("Unknown command '{}'. Type 'help' for commands.", word);
        return true;
    };
    let index = parts.next().and_then(|n| n.parse::<usize>().ok());

    match (verb, index) {
        (Verb::List, _) => {
            let cards = controller.channels().cards().to_vec();
            controller.view_mut().render_cards(&cards);
        }
        (Verb::Play, Some(n)) => match card_key(controller, n) {
            Some(key) => {
                if !controller.play_card(key) {
                    println!("Channel {} has no playable video", n);
                }
            }
            None => println!("No channel {}", n),
        },
        (Verb::Play, None) => {
            if !controller.play() {
                println!("Nothing to resume");
            }
        }
        (Verb::Pause, _) => {
            if !controller.pause() {
                println!("Nothing playing");
            }
        }
        (Verb::Mute, _) => {
            controller.toggle_mute();
            println!("Sound: {}", controller.view().mute_label);
        }
        (Verb::Stop, _) => controller.stop(),
        (Verb::Retry, _) => {
            if !controller.retry() {
                println!("Nothing to retry");
            }
        }
        (Verb::Open, Some(n)) => match card_key(controller, n) {
            Some(key) if controller.open_card(key) => {}
            _ => println!("No channel {}", n),
        },
        (Verb::Open, None) => {
            if !controller.open_external() {
                println!("Nothing selected");
            }
        }
        (Verb::Status, _) => println!("{}", controller.view().status()),
        (Verb::Help, _) => println!("{}", HELP),
        (Verb::Quit, _) => return false,
    }
    true
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "lofi_player=debug,lofi=debug"
    } else {
        "lofi_player=info,lofi=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(source) = args.source {
        config.channels.source = source;
    }
    if args.muted {
        config.playback.start_muted = true;
    }
    if args.no_titles {
        config.metadata.enabled = false;
    }

    let client = build_http_client(&config.network)?;
    let mut controller =
        PlaybackController::new(TerminalView::new(args.html), NoRichApi, config.playback.start_muted);

    let (tx, mut rx) = mpsc::unbounded_channel();
    match load_channel_list(&client, &config.channels.source).await {
        Ok(records) => {
            controller.show_channels(&records);
            if config.metadata.enabled {
                let source = OEmbedTitleSource::new(client.clone(), config.metadata.endpoint.clone());
                controller.refresh_titles(Arc::new(source), tx);
            }
        }
        Err(e) => controller.show_list_error(&e),
    }

    if let Some(n) = args.play {
        handle_line(&mut controller, &format!("play {}", n));
    }

    println!("Type 'help' for commands.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut titles_pending = true;
    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => {
                    if !handle_line(&mut controller, &line) {
                        break;
                    }
                }
                None => break,
            },
            update = rx.recv(), if titles_pending => match update {
                Some(update) => {
                    controller.apply_title_update(update);
                }
                None => titles_pending = false,
            },
        }
    }

    controller.stop();
    Ok(())
}
