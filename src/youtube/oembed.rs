use async_trait::async_trait;
use serde::Deserialize;

use crate::core::TitleSource;
use crate::download::download_json;
use crate::error::Result;

pub const DEFAULT_OEMBED_ENDPOINT: &str = "https://noembed.com/embed";

#[derive(Debug, Clone, Deserialize)]
pub struct OEmbedResponse {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

/// Title lookup through an oEmbed-style metadata service
#[derive(Debug, Clone)]
pub struct OEmbedTitleSource {
    client: reqwest::Client,
    endpoint: String,
}

impl OEmbedTitleSource {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn request_url(&self, url: &str) -> String {
        format!("{}?url={}", self.endpoint, urlencoding::encode(url))
    }
}

/// Pick a usable title out of a metadata response
pub fn title_from_response(resp: OEmbedResponse) -> Option<String> {
    resp.title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

#[async_trait]
impl TitleSource for OEmbedTitleSource {
    async fn fetch_title(&self, url: &str) -> Result<Option<String>> {
        let resp: OEmbedResponse = download_json(&self.client, &self.request_url(url)).await?;
        Ok(title_from_response(resp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_url_encodes_channel_url() {
        let source = OEmbedTitleSource::new(reqwest::Client::new(), DEFAULT_OEMBED_ENDPOINT);
        assert_eq!(
            source.request_url("https://www.youtube.com/watch?v=jfKfPfyJRdk"),
            "https://noembed.com/embed?url=https%3A%2F%2Fwww.youtube.com%2Fwatch%3Fv%3DjfKfPfyJRdk"
        );
    }

    #[test]
    fn test_title_from_response() {
        let resp: OEmbedResponse =
            serde_json::from_str(r#"{"title":"lofi hip hop radio","author_name":"Lofi Girl"}"#)
                .unwrap();
        assert_eq!(title_from_response(resp), Some("lofi hip hop radio".to_string()));

        let resp: OEmbedResponse = serde_json::from_str(r#"{"error":"no matching providers"}"#).unwrap();
        assert_eq!(title_from_response(resp), None);

        let resp: OEmbedResponse = serde_json::from_str(r#"{"title":"   "}"#).unwrap();
        assert_eq!(title_from_response(resp), None);
    }
}
