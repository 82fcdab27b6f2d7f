//! Anthropic Claude API adapter

use async_trait::async_trait;
use postforge_domain::{GenerateError, GenerationRequest, Generator};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{LlmConfig, SYSTEM_INSTRUCTION, build_post_prompt, generate_with_retries};

/// Post generator using the Anthropic Messages API
pub struct AnthropicGenerator {
    client: Client,
    api_key: SecretString,
    base_url: String,
    config: LlmConfig,
}

impl AnthropicGenerator {
    pub fn new(api_key: SecretString, config: LlmConfig) -> Self {
        Self::with_base_url(api_key, "https://api.anthropic.com".to_string(), config)
    }

    pub fn with_base_url(api_key: SecretString, base_url: String, config: LlmConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            api_key,
            base_url,
            config,
        }
    }

    async fn call_api(&self, prompt: &str) -> Result<String, GenerateError> {
        let request = AnthropicRequest {
            model: self.config.model.clone(),
            max_tokens: self.config.max_output_tokens,
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            system: Some(SYSTEM_INSTRUCTION.to_string()),
            temperature: Some(self.config.temperature),
        };

        let url = format!("{}/v1/messages", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", "2023-06-01")
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerateError::Timeout
                } else {
                    GenerateError::Api(e.to_string())
                }
            })?;

        if response.status() == 429 {
            return Err(GenerateError::RateLimited);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerateError::Api(format!(
                "API returned {}: {}",
                status, body
            )));
        }

        let api_response: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| GenerateError::InvalidFormat(e.to_string()))?;

        let text = api_response
            .content
            .into_iter()
            .filter_map(|c| if c.r#type == "text" { Some(c.text) } else { None })
            .collect::<Vec<_>>()
            .join("");

        if text.is_empty() {
            return Err(GenerateError::InvalidFormat("Empty response".to_string()));
        }

        Ok(text)
    }
}

#[derive(Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
}

#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    r#type: String,
    #[serde(default)]
    text: String,
}

#[async_trait]
impl Generator for AnthropicGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerateError> {
        let prompt = build_post_prompt(request);
        generate_with_retries(&self.config, || self.call_api(&prompt)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use postforge_domain::{ContentPreferences, Platform, WebsiteContent};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_request() -> GenerationRequest {
        GenerationRequest {
            content: WebsiteContent {
                title: "Launch Day".to_string(),
                description: String::new(),
                body: "Today we launched.".to_string(),
                url: "https://example.com/launch".to_string(),
            },
            platform: Platform::Instagram,
            preferences: ContentPreferences::default(),
        }
    }

    #[tokio::test]
    async fn test_generate_success() {
        let mock_server = MockServer::start().await;

        let body = serde_json::json!({
            "content": [
                { "type": "text", "text": "Big day. #launch https://example.com/launch" }
            ]
        });

        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&mock_server)
            .await;

        let generator = AnthropicGenerator::with_base_url(
            SecretString::new("test-key".into()),
            mock_server.uri(),
            LlmConfig::default(),
        );

        let text = generator.generate(&sample_request()).await.unwrap();

        assert!(text.contains("#launch"));
    }

    #[tokio::test]
    async fn test_generate_empty_content_is_invalid_format() {
        let mock_server = MockServer::start().await;

        let body = serde_json::json!({ "content": [] });

        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&mock_server)
            .await;

        let generator = AnthropicGenerator::with_base_url(
            SecretString::new("test-key".into()),
            mock_server.uri(),
            LlmConfig {
                retries: 0,
                ..Default::default()
            },
        );

        let result = generator.generate(&sample_request()).await;

        assert!(matches!(result, Err(GenerateError::InvalidFormat(_))));
    }
}
