//! Adapt command - one-shot platform adaptation of raw text

use anyhow::{Context, Result};
use postforge_domain::{Platform, PlatformAdapter};
use std::io::{self, Read};

use crate::args::AdaptArgs;

pub async fn execute(args: AdaptArgs) -> Result<()> {
    let text = get_input_text(&args)?;
    let platform: Platform = args.platform.parse()?;

    let adapter = PlatformAdapter::new();
    let post = adapter.adapt(&text, platform, &args.hashtags)?;
    let validation = adapter.validate(&post);

    if args.json {
        let json = serde_json::to_string_pretty(&post).context("Failed to serialize post")?;
        println!("{}", json);
    } else {
        let limit = platform.spec().character_limit;
        println!(
            "{} ({}/{} chars)",
            platform.display_name(),
            post.body.chars().count(),
            limit
        );
        println!();
        println!("{}", post.body);
        println!();
        if post.hashtags.is_empty() {
            println!("Hashtags: (none)");
        } else {
            println!("Hashtags: {}", post.hashtags.join(" "));
        }
        if post.truncated {
            println!("Note: input exceeded the {} character limit and was truncated", limit);
        }
        if !validation.passed {
            let names: Vec<_> = validation
                .violations
                .iter()
                .map(|v| v.as_str())
                .collect();
            println!("Warnings: {}", names.join(", "));
        }
    }

    Ok(())
}

fn get_input_text(args: &AdaptArgs) -> Result<String> {
    if let Some(ref text) = args.text {
        return Ok(text.clone());
    }

    if let Some(ref path) = args.file {
        if path.as_os_str() == "-" {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read from stdin")?;
            return Ok(text);
        }

        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()));
    }

    // Default to stdin if no input specified
    let mut text = String::new();
    io::stdin()
        .read_to_string(&mut text)
        .context("Failed to read from stdin")?;
    Ok(text)
}
