//! Firecrawl scrape API adapter

use async_trait::async_trait;
use postforge_domain::{ContentSource, FetchError, WebsiteContent};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Content source backed by the Firecrawl v1 scrape endpoint
pub struct FirecrawlSource {
    client: Client,
    api_key: SecretString,
    base_url: String,
}

impl FirecrawlSource {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.firecrawl.dev";

    pub fn new(api_key: SecretString, timeout_secs: u64) -> Self {
        Self::with_base_url(api_key, Self::DEFAULT_BASE_URL.to_string(), timeout_secs)
    }

    pub fn with_base_url(api_key: SecretString, base_url: String, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            api_key,
            base_url,
        }
    }
}

#[derive(Serialize)]
struct ScrapeRequest<'a> {
    url: &'a str,
    formats: Vec<&'a str>,
}

#[derive(Deserialize)]
struct ScrapeResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
    data: Option<ScrapeData>,
}

#[derive(Deserialize, Default)]
struct ScrapeData {
    #[serde(default)]
    markdown: String,
    #[serde(default)]
    metadata: ScrapeMetadata,
}

#[derive(Deserialize, Default)]
struct ScrapeMetadata {
    title: Option<String>,
    description: Option<String>,
    #[serde(rename = "ogDescription")]
    og_description: Option<String>,
    #[serde(rename = "sourceURL")]
    source_url: Option<String>,
}

#[async_trait]
impl ContentSource for FirecrawlSource {
    async fn fetch(&self, url: &str) -> Result<WebsiteContent, FetchError> {
        let request = ScrapeRequest {
            url,
            formats: vec!["markdown"],
        };

        let endpoint = format!("{}/v1/scrape", self.base_url);

        tracing::debug!(url = %url, "Requesting scrape");

        let response = self
            .client
            .post(&endpoint)
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout
                } else {
                    FetchError::Network(e.to_string())
                }
            })?;

        let status = response.status();

        if status == 401 || status == 403 {
            return Err(FetchError::Auth(format!("scrape API returned {}", status)));
        }

        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .map(Duration::from_secs);
            return Err(FetchError::RateLimited(retry_after));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Api(format!(
                "scrape API returned {}: {}",
                status, body
            )));
        }

        let api_response: ScrapeResponse = response
            .json()
            .await
            .map_err(|e| FetchError::Api(format!("invalid response body: {}", e)))?;

        if !api_response.success {
            return Err(FetchError::Api(
                api_response
                    .error
                    .unwrap_or_else(|| "scrape reported failure".to_string()),
            ));
        }

        let data = api_response
            .data
            .ok_or_else(|| FetchError::Api("response missing data".to_string()))?;

        if data.markdown.trim().is_empty() {
            return Err(FetchError::Api(
                "no markdown content in response".to_string(),
            ));
        }

        let metadata = data.metadata;

        Ok(WebsiteContent {
            title: metadata
                .title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| "Untitled".to_string()),
            description: metadata
                .description
                .or(metadata.og_description)
                .unwrap_or_default(),
            body: data.markdown,
            url: metadata.source_url.unwrap_or_else(|| url.to_string()),
        })
    }
}
