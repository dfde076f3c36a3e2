use thiserror::Error;

#[derive(Error, Debug)]
pub enum LofiError {
    #[error("Network request failed: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Request timeout for URL: {0}")]
    RequestTimeout(String),

    #[error("HTTP error {status} for URL: {url}")]
    HttpError { status: u16, url: String },

    #[error("Invalid URL format: {0}")]
    InvalidUrl(String),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid header value: {0}")]
    HeaderError(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Failed to load channel list from {source_name}: {reason}")]
    ChannelListError { source_name: String, reason: String },

    #[error("Config parse error: {0}")]
    ConfigParseError(#[from] toml::de::Error),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Rich player unavailable: {0}")]
    RichPlayerUnavailable(String),

    #[error("Rich player command failed: {0}")]
    PlayerCommandFailed(String),
}

pub type Result<T> = std::result::Result<T, LofiError>;
