//! Stub generator for testing and offline mode

use async_trait::async_trait;
use postforge_domain::{GenerateError, GenerationRequest, Generator};

/// Stub generator that returns configurable responses
pub struct StubGenerator {
    response: Option<String>,
    error: Option<GenerateError>,
}

impl StubGenerator {
    /// Create a stub that writes a deterministic post from the request
    pub fn template() -> Self {
        Self {
            response: None,
            error: None,
        }
    }

    /// Create a stub that returns a specific response
    pub fn with_response(response: impl Into<String>) -> Self {
        Self {
            response: Some(response.into()),
            error: None,
        }
    }

    /// Create a stub that always returns an error
    pub fn with_error(error: GenerateError) -> Self {
        Self {
            response: None,
            error: Some(error),
        }
    }
}

impl Default for StubGenerator {
    fn default() -> Self {
        Self::template()
    }
}

#[async_trait]
impl Generator for StubGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerateError> {
        if let Some(ref error) = self.error {
            return Err(match error {
                GenerateError::Api(msg) => GenerateError::Api(msg.clone()),
                GenerateError::InvalidFormat(msg) => GenerateError::InvalidFormat(msg.clone()),
                GenerateError::RateLimited => GenerateError::RateLimited,
                GenerateError::Timeout => GenerateError::Timeout,
                GenerateError::Config(msg) => GenerateError::Config(msg.clone()),
            });
        }

        if let Some(ref response) = self.response {
            return Ok(response.clone());
        }

        // Template mode: a plausible post assembled from the request,
        // identical for identical inputs
        let content = &request.content;
        let summary = if content.description.is_empty() {
            let body = content.body.trim();
            body.chars().take(80).collect::<String>()
        } else {
            content.description.clone()
        };

        Ok(format!(
            "{}: {} Read more at {} #{}",
            content.title,
            summary,
            content.url,
            request.platform.as_str()
        ))
    }
}
