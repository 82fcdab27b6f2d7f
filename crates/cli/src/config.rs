//! Configuration loading and management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use postforge_domain::model::{DEFAULT_AUDIENCE, DEFAULT_TONE};

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub content: ContentConfig,

    #[serde(default)]
    pub scrape: ScrapeConfig,

    #[serde(default)]
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    /// Platforms to generate for by default
    #[serde(default = "default_platforms")]
    pub platforms: Vec<String>,

    /// Whether generate saves a markdown file by default
    #[serde(default = "default_true")]
    pub save_outputs: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    #[serde(default = "default_audience")]
    pub audience: String,

    #[serde(default = "default_tone")]
    pub tone: String,

    /// Custom hashtags merged into every post
    #[serde(default)]
    pub hashtags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// Scrape provider: firecrawl or stub
    #[serde(default = "default_scrape_provider")]
    pub provider: String,

    #[serde(default)]
    pub firecrawl: FirecrawlConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirecrawlConfig {
    #[serde(default = "default_firecrawl_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_firecrawl_base_url")]
    pub base_url: String,

    #[serde(default = "default_scrape_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Generation provider: openai, anthropic, ollama, or stub
    #[serde(default = "default_llm_provider")]
    pub provider: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f64,

    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_llm_retries")]
    pub retries: u32,

    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    #[serde(default)]
    pub openai: OpenAiConfig,

    #[serde(default)]
    pub anthropic: AnthropicConfig,

    #[serde(default)]
    pub ollama: OllamaConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenAiConfig {
    #[serde(default = "default_openai_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_openai_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnthropicConfig {
    #[serde(default = "default_anthropic_api_key_env")]
    pub api_key_env: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OllamaConfig {
    #[serde(default = "default_ollama_base_url")]
    pub base_url: String,
}

// Default value functions
fn default_output_dir() -> PathBuf {
    PathBuf::from("./outputs")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_concurrent() -> usize {
    4
}

fn default_platforms() -> Vec<String> {
    vec![
        "twitter".to_string(),
        "linkedin".to_string(),
        "facebook".to_string(),
        "instagram".to_string(),
    ]
}

fn default_true() -> bool {
    true
}

fn default_audience() -> String {
    DEFAULT_AUDIENCE.to_string()
}

fn default_tone() -> String {
    DEFAULT_TONE.to_string()
}

fn default_scrape_provider() -> String {
    "firecrawl".to_string()
}

fn default_firecrawl_api_key_env() -> String {
    "FIRECRAWL_API_KEY".to_string()
}

fn default_firecrawl_base_url() -> String {
    "https://api.firecrawl.dev".to_string()
}

fn default_scrape_timeout() -> u64 {
    30
}

fn default_llm_provider() -> String {
    "openai".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_llm_timeout() -> u64 {
    45
}

fn default_llm_retries() -> u32 {
    2
}

fn default_max_output_tokens() -> u32 {
    600
}

fn default_openai_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_anthropic_api_key_env() -> String {
    "ANTHROPIC_API_KEY".to_string()
}

fn default_ollama_base_url() -> String {
    "http://localhost:11434".to_string()
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            log_level: default_log_level(),
            max_concurrent: default_max_concurrent(),
            platforms: default_platforms(),
            save_outputs: default_true(),
        }
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            audience: default_audience(),
            tone: default_tone(),
            hashtags: vec![],
        }
    }
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            provider: default_scrape_provider(),
            firecrawl: FirecrawlConfig::default(),
        }
    }
}

impl Default for FirecrawlConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_firecrawl_api_key_env(),
            base_url: default_firecrawl_base_url(),
            timeout_secs: default_scrape_timeout(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_llm_provider(),
            model: default_model(),
            temperature: default_temperature(),
            timeout_secs: default_llm_timeout(),
            retries: default_llm_retries(),
            max_output_tokens: default_max_output_tokens(),
            openai: OpenAiConfig::default(),
            anthropic: AnthropicConfig::default(),
            ollama: OllamaConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        // Try default config path if none specified
        let default_path = PathBuf::from("./config.toml");
        let path = config_path.unwrap_or(&default_path);

        if path.exists() {
            builder = builder.add_source(config::File::from(path));
        } else if config_path.is_some() {
            // User specified a path that doesn't exist
            anyhow::bail!("Config file not found: {}", path.display());
        }

        // Add environment variable overrides
        builder = builder.add_source(
            config::Environment::with_prefix("POSTFORGE")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Generate example configuration as TOML string
    pub fn example_toml() -> String {
        r##"# postforge configuration

[general]
output_dir = "./outputs"
log_level = "info"
max_concurrent = 4
platforms = ["twitter", "linkedin", "facebook", "instagram"]
save_outputs = true

[content]
audience = "general professional audience"
tone = "informative and engaging"
# hashtags = ["#mybrand"]

[scrape]
provider = "firecrawl"  # firecrawl, stub

[scrape.firecrawl]
api_key_env = "FIRECRAWL_API_KEY"
base_url = "https://api.firecrawl.dev"
timeout_secs = 30

[llm]
provider = "openai"  # openai, anthropic, ollama, stub
model = "gpt-4o-mini"
temperature = 0.7
timeout_secs = 45
retries = 2
max_output_tokens = 600

[llm.openai]
api_key_env = "OPENAI_API_KEY"
base_url = "https://api.openai.com/v1"

[llm.anthropic]
api_key_env = "ANTHROPIC_API_KEY"

[llm.ollama]
base_url = "http://localhost:11434"
"##
        .to_string()
    }
}
