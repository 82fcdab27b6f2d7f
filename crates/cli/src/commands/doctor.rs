//! Doctor command - validate configuration and show status

use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;

use crate::args::DoctorArgs;
use crate::config::AppConfig;

#[derive(Debug, Serialize)]
struct DoctorReport {
    config: CheckResult,
    scrape: CheckResult,
    llm: CheckResult,
    output: CheckResult,
    overall: String,
}

#[derive(Debug, Serialize)]
struct CheckResult {
    status: String,
    message: String,
}

impl CheckResult {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            message: message.into(),
        }
    }

    fn warn(message: impl Into<String>) -> Self {
        Self {
            status: "warn".to_string(),
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
        }
    }

    fn is_error(&self) -> bool {
        self.status == "error"
    }

    fn is_warn(&self) -> bool {
        self.status == "warn"
    }
}

pub async fn execute(args: DoctorArgs, config_path: Option<PathBuf>) -> Result<()> {
    let mut report = DoctorReport {
        config: CheckResult::error("Not checked"),
        scrape: CheckResult::error("Not checked"),
        llm: CheckResult::error("Not checked"),
        output: CheckResult::error("Not checked"),
        overall: "error".to_string(),
    };

    // Check config
    let config = match AppConfig::load(config_path.as_deref()) {
        Ok(c) => {
            report.config = CheckResult::ok("Configuration loaded successfully");
            Some(c)
        }
        Err(e) => {
            report.config = CheckResult::error(format!("Failed to load config: {}", e));
            None
        }
    };

    if let Some(ref config) = config {
        report.scrape = check_scrape(config);
        report.llm = check_llm(config);
        report.output = check_output(config);
    }

    let checks = [&report.config, &report.scrape, &report.llm, &report.output];
    let has_error = checks.iter().any(|c| c.is_error());
    let has_warn = checks.iter().any(|c| c.is_warn());

    report.overall = if has_error {
        "error".to_string()
    } else if has_warn {
        "warn".to_string()
    } else {
        "ok".to_string()
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if has_error {
        std::process::exit(1);
    }

    Ok(())
}

fn check_scrape(config: &AppConfig) -> CheckResult {
    match config.scrape.provider.as_str() {
        "firecrawl" => check_api_key(&config.scrape.firecrawl.api_key_env, "Firecrawl"),
        "stub" => CheckResult::ok("Stub scrape provider (offline, fixed content)"),
        other => CheckResult::error(format!("Unknown scrape provider: {}", other)),
    }
}

fn check_llm(config: &AppConfig) -> CheckResult {
    match config.llm.provider.as_str() {
        "openai" => check_api_key(&config.llm.openai.api_key_env, "OpenAI"),
        "anthropic" => check_api_key(&config.llm.anthropic.api_key_env, "Anthropic"),
        "ollama" => CheckResult::ok(format!(
            "Ollama at {} (no API key required)",
            config.llm.ollama.base_url
        )),
        "stub" => CheckResult::ok("Stub LLM provider (offline, deterministic output)"),
        other => CheckResult::error(format!("Unknown LLM provider: {}", other)),
    }
}

fn check_output(config: &AppConfig) -> CheckResult {
    let dir = &config.general.output_dir;
    if !config.general.save_outputs {
        return CheckResult::ok("Saving outputs is disabled");
    }
    if dir.is_dir() {
        CheckResult::ok(format!("Output directory exists: {}", dir.display()))
    } else {
        CheckResult::warn(format!(
            "Output directory {} will be created on first save",
            dir.display()
        ))
    }
}

fn check_api_key(env_var: &str, provider: &str) -> CheckResult {
    if env_var.trim().is_empty() {
        return CheckResult::error(format!("No API key env var configured for {}", provider));
    }
    match std::env::var(env_var) {
        Ok(value) if !value.trim().is_empty() => {
            CheckResult::ok(format!("{} API key found in {}", provider, env_var))
        }
        _ => CheckResult::error(format!(
            "{} API key env var {} is not set",
            provider, env_var
        )),
    }
}

fn print_report(report: &DoctorReport) {
    println!("postforge doctor");
    println!("================");
    println!();
    print_check("Config", &report.config);
    print_check("Scrape", &report.scrape);
    print_check("LLM", &report.llm);
    print_check("Output", &report.output);
    println!();
    println!("Overall: {}", report.overall);
}

fn print_check(name: &str, check: &CheckResult) {
    println!("[{:>5}] {}: {}", check.status, name, check.message);
}
