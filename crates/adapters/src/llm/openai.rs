//! OpenAI Responses API adapter

use async_trait::async_trait;
use postforge_domain::{GenerateError, GenerationRequest, Generator};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{LlmConfig, SYSTEM_INSTRUCTION, build_post_prompt, generate_with_retries};

/// Post generator using the OpenAI Responses API
pub struct OpenAiGenerator {
    client: Client,
    api_key: SecretString,
    base_url: String,
    config: LlmConfig,
}

impl OpenAiGenerator {
    pub fn new(api_key: SecretString, config: LlmConfig) -> Self {
        Self::with_base_url(api_key, "https://api.openai.com/v1".to_string(), config)
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
        let request = OpenAiRequest {
            model: self.config.model.clone(),
            input: prompt.to_string(),
            instructions: Some(SYSTEM_INSTRUCTION.to_string()),
            temperature: Some(self.config.temperature),
            max_output_tokens: Some(self.config.max_output_tokens),
        };

        let url = format!("{}/responses", self.base_url);

        let response = self
            .client
            .post(&url)
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

        let api_response: OpenAiResponse = response
            .json()
            .await
            .map_err(|e| GenerateError::InvalidFormat(e.to_string()))?;

        let text = api_response
            .output
            .into_iter()
            .filter_map(|item| {
                if item.r#type == "message" {
                    item.content.into_iter().find_map(|c| {
                        if c.r#type == "output_text" {
                            Some(c.text)
                        } else {
                            None
                        }
                    })
                } else {
                    None
                }
            })
            .collect::<Vec<_>>()
            .join("");

        if text.is_empty() {
            return Err(GenerateError::InvalidFormat("Empty response".to_string()));
        }

        Ok(text)
    }
}

#[derive(Serialize)]
struct OpenAiRequest {
    model: String,
    input: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    instructions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Deserialize)]
struct OpenAiResponse {
    output: Vec<OutputItem>,
}

#[derive(Deserialize)]
struct OutputItem {
    r#type: String,
    #[serde(default)]
    content: Vec<ContentItem>,
}

#[derive(Deserialize)]
struct ContentItem {
    r#type: String,
    #[serde(default)]
    text: String,
}

#[async_trait]
impl Generator for OpenAiGenerator {
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
                description: "We shipped".to_string(),
                body: "Today we launched.".to_string(),
                url: "https://example.com/launch".to_string(),
            },
            platform: Platform::Twitter,
            preferences: ContentPreferences::default(),
        }
    }

    fn mock_success_response(text: &str) -> serde_json::Value {
        serde_json::json!({
            "output": [
                {
                    "type": "message",
                    "content": [
                        { "type": "output_text", "text": text }
                    ]
                }
            ]
        })
    }

    #[tokio::test]
    async fn test_generate_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/responses"))
            .and(header("Authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(mock_success_response(
                "Launch day is here! #launch https://example.com/launch",
            )))
            .mount(&mock_server)
            .await;

        let generator = OpenAiGenerator::with_base_url(
            SecretString::new("test-key".into()),
            mock_server.uri(),
            LlmConfig::default(),
        );

        let text = generator.generate(&sample_request()).await.unwrap();

        assert!(text.contains("#launch"));
    }

    #[tokio::test]
    async fn test_generate_strips_code_fence() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/responses"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(mock_success_response("```\nFenced post\n```")),
            )
            .mount(&mock_server)
            .await;

        let generator = OpenAiGenerator::with_base_url(
            SecretString::new("test-key".into()),
            mock_server.uri(),
            LlmConfig::default(),
        );

        let text = generator.generate(&sample_request()).await.unwrap();

        assert_eq!(text, "Fenced post");
    }

    #[tokio::test]
    async fn test_generate_rate_limited() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/responses"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&mock_server)
            .await;

        let generator = OpenAiGenerator::with_base_url(
            SecretString::new("test-key".into()),
            mock_server.uri(),
            LlmConfig {
                retries: 0,
                ..Default::default()
            },
        );

        let result = generator.generate(&sample_request()).await;

        assert!(matches!(result, Err(GenerateError::RateLimited)));
    }

    #[tokio::test]
    async fn test_generate_api_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/responses"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal error"))
            .mount(&mock_server)
            .await;

        let generator = OpenAiGenerator::with_base_url(
            SecretString::new("test-key".into()),
            mock_server.uri(),
            LlmConfig {
                retries: 0,
                ..Default::default()
            },
        );

        let result = generator.generate(&sample_request()).await;

        assert!(matches!(result, Err(GenerateError::Api(_))));
    }
}
