use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::NetworkConfig;
use crate::core::ChannelRecord;
use crate::error::{LofiError, Result};

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/143.0.0.0 Safari/537.36";

/// Build the shared HTTP client from the network settings
pub fn build_http_client(config: &NetworkConfig) -> Result<reqwest::Client> {
    let timeout = Duration::from_secs(config.timeout_secs);
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_str(&config.user_agent)?);

    let client = reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout)
        .default_headers(headers)
        .build()?;
    Ok(client)
}

/// Execute GET request with error handling
async fn execute_request(client: &reqwest::Client, url: &str) -> Result<reqwest::Response> {
    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            LofiError::RequestTimeout(url.to_string())
        } else {
            LofiError::NetworkError(e)
        }
    })?;

    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(LofiError::HttpError {
            status: status.as_u16(),
            url: url.to_string(),
        })
    }
}

/// Download and parse JSON response from URL
pub async fn download_json<T: DeserializeOwned>(client: &reqwest::Client, url: &str) -> Result<T> {
    let response = execute_request(client, url).await?;
    response.json::<T>().await.map_err(LofiError::from)
}

/// Download text content from URL
pub async fn download_text(client: &reqwest::Client, url: &str) -> Result<String> {
    let response = execute_request(client, url).await?;
    response.text().await.map_err(LofiError::from)
}

fn is_http_url(source: &str) -> bool {
    url::Url::parse(source)
        .map(|u| u.scheme() == "http" || u.scheme() == "https")
        .unwrap_or(false)
}

/// Parse a channel list document
pub fn parse_channel_list(json: &str) -> Result<Vec<ChannelRecord>> {
    Ok(serde_json::from_str(json)?)
}

/// Load the channel list from a local path or an http(s) URL
pub async fn load_channel_list(
    client: &reqwest::Client,
    source: &str,
) -> Result<Vec<ChannelRecord>> {
    let text = if is_http_url(source) {
        debug!("Fetching channel list from {}", source);
        download_text(client, source).await
    } else {
        debug!("Reading channel list from {}", source);
        tokio::fs::read_to_string(source)
            .await
            .map_err(LofiError::from)
    };

    let records = text
        .and_then(|t| parse_channel_list(&t))
        .map_err(|e| LofiError::ChannelListError {
            source_name: source.to_string(),
            reason: e.to_string(),
        })?;

    info!("Loaded {} channels from {}", records.len(), source);
    Ok(records)
}
