//! CLI argument definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// postforge: generate platform-conformant social media posts from a URL
#[derive(Parser, Debug)]
#[command(name = "postforge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract a page, generate posts for each platform, and save them
    Generate(GenerateArgs),

    /// One-shot adaptation of raw text for a single platform
    Adapt(AdaptArgs),

    /// Configuration management
    Config(ConfigArgs),

    /// Validate configuration and show status
    Doctor(DoctorArgs),
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Website URL to generate posts for
    pub url: String,

    /// Target audience for the posts
    #[arg(long)]
    pub audience: Option<String>,

    /// Tone of voice for the posts
    #[arg(long)]
    pub tone: Option<String>,

    /// Custom hashtag to merge into every post (repeatable)
    #[arg(long = "hashtag")]
    pub hashtags: Vec<String>,

    /// Platform to target (repeatable; defaults to all supported)
    #[arg(long = "platform")]
    pub platforms: Vec<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Skip writing the markdown output file
    #[arg(long)]
    pub no_save: bool,

    /// Override the output directory for saved posts
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct AdaptArgs {
    /// Raw text to adapt
    #[arg(long, conflicts_with = "file")]
    pub text: Option<String>,

    /// File containing raw text (use - for stdin)
    #[arg(long, conflicts_with = "text")]
    pub file: Option<PathBuf>,

    /// Target platform (twitter, linkedin, facebook, instagram)
    #[arg(long)]
    pub platform: String,

    /// Custom hashtag to merge (repeatable)
    #[arg(long = "hashtag")]
    pub hashtags: Vec<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Init {
        /// Path to write config file
        #[arg(long, default_value = "./config.toml")]
        path: PathBuf,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug)]
pub struct DoctorArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
