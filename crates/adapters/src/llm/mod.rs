//! LLM provider adapters

pub mod anthropic;
pub mod ollama;
pub mod openai;
pub mod stub;

pub use anthropic::AnthropicGenerator;
pub use ollama::OllamaGenerator;
pub use openai::OpenAiGenerator;
pub use stub::StubGenerator;

use postforge_domain::{GenerateError, GenerationRequest, Platform};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

/// Common LLM configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Model name/ID
    pub model: String,
    /// Temperature (0.0-1.0)
    pub temperature: f64,
    /// Maximum output tokens
    pub max_output_tokens: u32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries on failure
    pub retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_output_tokens: 600,
            timeout_secs: 45,
            retries: 2,
        }
    }
}

/// System instruction shared by the chat-style providers
pub(crate) const SYSTEM_INSTRUCTION: &str =
    "You are a social media copywriter. Respond with only the post text.";

/// Native writing style for each platform, fed into the prompt
fn platform_style(platform: Platform) -> &'static str {
    match platform {
        Platform::Twitter => {
            "Punchy and concise. Lead with the hook and keep sentences short."
        }
        Platform::Linkedin => {
            "Professional and insight-driven. Short paragraphs with a clear takeaway \
             and an invitation to discuss."
        }
        Platform::Facebook => {
            "Conversational and friendly. A short story-like setup before the link works well."
        }
        Platform::Instagram => {
            "Caption energy: evocative language, line breaks welcome, hashtags at the end."
        }
    }
}

/// Build the post-writing prompt for one platform
pub fn build_post_prompt(request: &GenerationRequest) -> String {
    let spec = request.platform.spec();
    let content = &request.content;
    let preferences = &request.preferences;

    let mut prompt = String::new();

    prompt.push_str(
        "You are a social media content expert. Write one post promoting the web page below.\n\n",
    );

    prompt.push_str("## Source Page\n");
    prompt.push_str(&format!("Title: {}\n", content.title));
    if !content.description.is_empty() {
        prompt.push_str(&format!("Description: {}\n", content.description));
    }
    prompt.push_str(&format!("URL: {}\n", content.url));
    prompt.push_str(&format!("Content:\n{}\n\n", content.body));

    prompt.push_str("## Target\n");
    prompt.push_str(&format!("Platform: {}\n", request.platform.display_name()));
    prompt.push_str(&format!("Character limit: {}\n", spec.character_limit));
    prompt.push_str(&format!("Style: {}\n\n", platform_style(request.platform)));

    prompt.push_str("## Voice\n");
    prompt.push_str(&format!("Audience: {}\n", preferences.audience));
    prompt.push_str(&format!("Tone: {}\n\n", preferences.tone));

    prompt.push_str(
        "## Rules\n\
         - Stay within the character limit.\n\
         - Include a compelling call-to-action with the page URL.\n\
         - Include at most five relevant hashtags, written inline as #tag.\n\
         - Respond with ONLY the post text: no preamble, no code fences, \
         no quotation marks around the post.\n",
    );

    prompt
}

/// Strip the wrappers models like to add around otherwise plain text
pub fn clean_response(response: &str) -> String {
    let mut text = response.trim();

    // Unwrap a ```fence``` around the whole response, dropping an
    // optional language tag on the opening line
    if text.starts_with("```") && text.ends_with("```") && text.len() > 6 {
        let inner = &text[3..text.len() - 3];
        text = match inner.split_once('\n') {
            Some((first, rest)) if !first.trim().is_empty() && !first.contains(' ') => rest,
            _ => inner,
        };
        text = text.trim();
    }

    // Models sometimes quote the entire post
    let unquoted = text
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .or_else(|| {
            text.strip_prefix('\u{201c}')
                .and_then(|t| t.strip_suffix('\u{201d}'))
        });
    if let Some(inner) = unquoted {
        text = inner.trim();
    }

    text.to_string()
}

/// Shared retry loop: exponential backoff, rate limiting is terminal,
/// and the response is cleaned before being accepted.
pub(crate) async fn generate_with_retries<F, Fut>(
    config: &LlmConfig,
    mut call: F,
) -> Result<String, GenerateError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<String, GenerateError>>,
{
    let mut last_error = None;

    for attempt in 0..=config.retries {
        if attempt > 0 {
            tracing::warn!(attempt = attempt, "Retrying generation");
            tokio::time::sleep(Duration::from_millis(500 * 2_u64.pow(attempt))).await;
        }

        match call().await {
            Ok(response_text) => {
                let cleaned = clean_response(&response_text);
                if cleaned.is_empty() {
                    tracing::warn!("Provider returned an empty post, will retry");
                    last_error =
                        Some(GenerateError::InvalidFormat("empty response".to_string()));
                    continue;
                }
                return Ok(cleaned);
            }
            Err(GenerateError::RateLimited) => {
                return Err(GenerateError::RateLimited);
            }
            Err(e) => {
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| GenerateError::Api("unknown error".to_string())))
}
