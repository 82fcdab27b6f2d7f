//! Generate command - full pipeline from URL to saved posts

use anyhow::{Context, Result, bail};
use postforge_adapters::export::MarkdownSink;
use postforge_adapters::llm::{
    AnthropicGenerator, LlmConfig as AdapterLlmConfig, OllamaGenerator, OpenAiGenerator,
    StubGenerator,
};
use postforge_adapters::scrape::{FirecrawlSource, StubSource};
use postforge_domain::usecases::{Pipeline, PipelineConfig};
use postforge_domain::{
    ContentPreferences, ContentSource, GenerationRun, Generator, Platform, PlatformAdapter,
    PostSink, SystemClock,
};
use secrecy::SecretString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::args::GenerateArgs;
use crate::config::AppConfig;

pub async fn execute(args: GenerateArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;

    let preferences = ContentPreferences {
        audience: args
            .audience
            .unwrap_or_else(|| config.content.audience.clone()),
        tone: args.tone.unwrap_or_else(|| config.content.tone.clone()),
        hashtags: if args.hashtags.is_empty() {
            config.content.hashtags.clone()
        } else {
            args.hashtags.clone()
        },
    };

    let platform_names = if args.platforms.is_empty() {
        config.general.platforms.clone()
    } else {
        args.platforms.clone()
    };
    let platforms = parse_platforms(&platform_names)?;

    let source = build_source(&config)?;
    let generator = build_generator(&config)?;

    let pipeline = Pipeline::new(
        source,
        generator,
        Arc::new(SystemClock),
        PipelineConfig {
            platforms,
            max_concurrent: config.general.max_concurrent.max(1),
        },
    );

    tracing::info!(url = %args.url, "Starting generation run");

    let run = pipeline
        .run(&args.url, &preferences)
        .await
        .context("Generation failed")?;

    let save = !args.no_save && (config.general.save_outputs || args.output_dir.is_some());
    let saved_path = if save {
        let output_dir = args
            .output_dir
            .unwrap_or_else(|| config.general.output_dir.clone());
        let sink = MarkdownSink::new(output_dir);
        Some(
            sink.export(&run)
                .await
                .context("Failed to save posts to markdown")?,
        )
    } else {
        None
    };

    if args.json {
        let json = serde_json::to_string_pretty(&run).context("Failed to serialize run")?;
        println!("{}", json);
    } else {
        print_run(&run, saved_path.as_deref());
    }

    Ok(())
}

fn print_run(run: &GenerationRun, saved_path: Option<&Path>) {
    let adapter = PlatformAdapter::new();

    println!("Generated Posts");
    println!("===============");
    println!();
    println!("Source: {}", run.url);
    println!("Audience: {}", run.preferences.audience);
    println!("Tone: {}", run.preferences.tone);
    if let Some(path) = saved_path {
        println!("Saved to: {}", path.display());
    }
    println!();

    for post in run.posts() {
        let limit = post.platform.spec().character_limit;
        println!(
            "## {} ({}/{} chars)",
            post.platform.display_name(),
            post.body.chars().count(),
            limit
        );
        println!("{}", post.body);
        if !post.hashtags.is_empty() {
            println!("Hashtags: {}", post.hashtags.join(" "));
        }
        if post.truncated {
            println!("(truncated to fit the {} character limit)", limit);
        }

        let validation = adapter.validate(post);
        if !validation.passed {
            let names: Vec<_> = validation
                .violations
                .iter()
                .map(|v| v.as_str())
                .collect();
            println!("Warnings: {}", names.join(", "));
        }
        println!();
    }

    let failures: Vec<_> = run.failures().collect();
    if !failures.is_empty() {
        println!("Failed platforms:");
        for (platform, error) in failures {
            println!("  - {}: {}", platform.display_name(), error);
        }
    }
}

/// Parse and dedup platform names, preserving order
fn parse_platforms(names: &[String]) -> Result<Vec<Platform>> {
    let mut platforms: Vec<Platform> = Vec::new();
    for name in names {
        let platform: Platform = name.parse()?;
        if !platforms.contains(&platform) {
            platforms.push(platform);
        }
    }
    if platforms.is_empty() {
        bail!("No platforms selected");
    }
    Ok(platforms)
}

fn build_source(config: &AppConfig) -> Result<Arc<dyn ContentSource>> {
    match config.scrape.provider.as_str() {
        "firecrawl" => {
            let api_key = load_api_key(&config.scrape.firecrawl.api_key_env, "firecrawl")?;
            Ok(Arc::new(FirecrawlSource::with_base_url(
                api_key,
                config.scrape.firecrawl.base_url.clone(),
                config.scrape.firecrawl.timeout_secs,
            )))
        }
        "stub" => Ok(Arc::new(StubSource::sample())),
        other => bail!("Unknown scrape provider: {}", other),
    }
}

fn build_generator(config: &AppConfig) -> Result<Arc<dyn Generator>> {
    let llm_config = adapter_llm_config(&config.llm);

    match config.llm.provider.as_str() {
        "openai" => {
            let api_key = load_api_key(&config.llm.openai.api_key_env, "openai")?;
            Ok(Arc::new(OpenAiGenerator::with_base_url(
                api_key,
                config.llm.openai.base_url.clone(),
                llm_config,
            )))
        }
        "anthropic" => {
            let api_key = load_api_key(&config.llm.anthropic.api_key_env, "anthropic")?;
            Ok(Arc::new(AnthropicGenerator::new(api_key, llm_config)))
        }
        "ollama" => {
            let base_url = config.llm.ollama.base_url.trim();
            if base_url.is_empty() {
                Ok(Arc::new(OllamaGenerator::new(llm_config)))
            } else {
                Ok(Arc::new(OllamaGenerator::with_base_url(
                    base_url.to_string(),
                    llm_config,
                )))
            }
        }
        "stub" => Ok(Arc::new(StubGenerator::template())),
        other => bail!("Unknown LLM provider: {}", other),
    }
}

fn adapter_llm_config(config: &crate::config::LlmConfig) -> AdapterLlmConfig {
    AdapterLlmConfig {
        model: config.model.clone(),
        temperature: config.temperature,
        max_output_tokens: config.max_output_tokens,
        timeout_secs: config.timeout_secs,
        retries: config.retries,
    }
}

pub(crate) fn load_api_key(env_var: &str, provider: &str) -> Result<SecretString> {
    if env_var.trim().is_empty() {
        bail!("No API key env var configured for provider {}", provider);
    }

    let key = std::env::var(env_var).with_context(|| {
        format!(
            "Missing API key env var {} for provider {}",
            env_var, provider
        )
    })?;

    if key.trim().is_empty() {
        bail!(
            "API key env var {} is empty for provider {}",
            env_var,
            provider
        );
    }

    Ok(SecretString::new(key.into()))
}
