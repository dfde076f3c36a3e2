use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::download::DEFAULT_USER_AGENT;
use crate::error::{LofiError, Result};
use crate::youtube::oembed::DEFAULT_OEMBED_ENDPOINT;

pub const CONFIG_DIR_NAME: &str = "lofi-player";
pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub channels: ChannelsConfig,

    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub metadata: MetadataConfig,

    #[serde(default)]
    pub playback: PlaybackConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChannelsConfig {
    /// Local path or http(s) URL of the channel list
    #[serde(default = "default_source")]
    pub source: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkConfig {
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetadataConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PlaybackConfig {
    #[serde(default)]
    pub start_muted: bool,
}

impl Default for ChannelsConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: default_endpoint(),
        }
    }
}

fn default_source() -> String {
    "data/channels.json".to_string()
}

fn default_timeout() -> u64 {
    15
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_true() -> bool {
    true
}

fn default_endpoint() -> String {
    DEFAULT_OEMBED_ENDPOINT.to_string()
}

impl Config {
    /// Load from `path`, or from the default location when `None`.
    /// A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        if config_path.exists() {
            debug!("Loading config from {:?}", config_path);
            let contents = fs::read_to_string(&config_path)?;
            let config = Self::parse(&contents)?;
            info!("Config loaded from {:?}", config_path);
            Ok(config)
        } else {
            info!("No config file at {:?}, using defaults", config_path);
            Ok(Config::default())
        }
    }

    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn config_path() -> Result<PathBuf> {
        let dir = dirs::config_dir()
            .ok_or_else(|| LofiError::ConfigError("Cannot determine config directory".to_string()))?;
        Ok(dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }
}
