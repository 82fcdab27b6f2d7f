//! Port definitions (traits) for external collaborators
//!
//! These traits define the boundaries between the domain and external
//! systems. Adapters implement them to connect to real infrastructure;
//! the domain never retries or recovers on a collaborator's behalf.

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;
use time::OffsetDateTime;

use crate::model::{GenerationRequest, GenerationRun, WebsiteContent};

/// Error type for content extraction
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("scrape API error: {0}")]
    Api(String),
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out")]
    Timeout,
    #[error("rate limited, retry after: {0:?}")]
    RateLimited(Option<std::time::Duration>),
}

/// Port for extracting content from a web page
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Fetch and extract the content behind a URL
    async fn fetch(&self, url: &str) -> Result<WebsiteContent, FetchError>;
}

/// Error type for post generation
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("LLM API error: {0}")]
    Api(String),
    #[error("invalid response format: {0}")]
    InvalidFormat(String),
    #[error("rate limited")]
    RateLimited,
    #[error("timeout")]
    Timeout,
    #[error("configuration error: {0}")]
    Config(String),
}

/// Port for LLM-backed post drafting
#[async_trait]
pub trait Generator: Send + Sync {
    /// Produce raw candidate post text for one platform
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerateError>;
}

/// Error type for persisting run output
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("format error: {0}")]
    Format(String),
}

/// Port for writing a completed run somewhere useful
#[async_trait]
pub trait PostSink: Send + Sync {
    /// Persist the run, returning the written path
    async fn export(&self, run: &GenerationRun) -> Result<PathBuf, ExportError>;
}

/// Port for time/clock operations (enables deterministic testing)
pub trait Clock: Send + Sync {
    /// Get the current time
    fn now(&self) -> OffsetDateTime;
}

/// Real clock implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}
