//! Stub content source for testing and offline mode

use async_trait::async_trait;
use postforge_domain::{ContentSource, FetchError, WebsiteContent};

/// Stub source that returns configurable content
pub struct StubSource {
    content: Option<WebsiteContent>,
    error: Option<FetchError>,
}

impl StubSource {
    /// Create a stub that returns fixed sample content for any URL
    pub fn sample() -> Self {
        Self {
            content: None,
            error: None,
        }
    }

    /// Create a stub that returns specific content
    pub fn with_content(content: WebsiteContent) -> Self {
        Self {
            content: Some(content),
            error: None,
        }
    }

    /// Create a stub that always fails
    pub fn with_error(error: FetchError) -> Self {
        Self {
            content: None,
            error: Some(error),
        }
    }
}

impl Default for StubSource {
    fn default() -> Self {
        Self::sample()
    }
}

#[async_trait]
impl ContentSource for StubSource {
    async fn fetch(&self, url: &str) -> Result<WebsiteContent, FetchError> {
        if let Some(ref error) = self.error {
            return Err(match error {
                FetchError::InvalidUrl(msg) => FetchError::InvalidUrl(msg.clone()),
                FetchError::Api(msg) => FetchError::Api(msg.clone()),
                FetchError::Auth(msg) => FetchError::Auth(msg.clone()),
                FetchError::Network(msg) => FetchError::Network(msg.clone()),
                FetchError::Timeout => FetchError::Timeout,
                FetchError::RateLimited(d) => FetchError::RateLimited(*d),
            });
        }

        if let Some(ref content) = self.content {
            return Ok(content.clone());
        }

        Ok(WebsiteContent {
            title: "Sample Page".to_string(),
            description: "A fixed page used for offline runs".to_string(),
            body: "This sample page stands in for real extracted content. \
                   It describes a product launch with enough text to write about."
                .to_string(),
            url: url.to_string(),
        })
    }
}
