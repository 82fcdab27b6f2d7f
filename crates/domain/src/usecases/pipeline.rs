//! Pipeline use case - orchestrates extraction, generation, and adaptation
//!
//! One run covers one URL: content is fetched once, then each selected
//! platform gets its own generation with bounded concurrency. Platforms
//! are independent, so one failure never aborts the others.

use futures::stream::{self, StreamExt};
use std::sync::Arc;
use thiserror::Error;
use url::Url;

use crate::{
    model::{ContentPreferences, GenerationRun, Platform, PlatformResult},
    ports::{Clock, ContentSource, FetchError, Generator},
    usecases::generate::GenerateUseCase,
};

/// Configuration for the pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Platforms to generate for, in output order
    pub platforms: Vec<Platform>,
    /// Maximum concurrent generation calls
    pub max_concurrent: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            platforms: Platform::ALL.to_vec(),
            max_concurrent: 4,
        }
    }
}

/// Errors that abort a whole run
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Pipeline orchestrator
pub struct Pipeline<S, G, Cl>
where
    S: ContentSource + ?Sized,
    G: Generator + ?Sized,
    Cl: Clock + ?Sized,
{
    source: Arc<S>,
    drafter: GenerateUseCase<G>,
    clock: Arc<Cl>,
    config: PipelineConfig,
}

impl<S, G, Cl> Pipeline<S, G, Cl>
where
    S: ContentSource + ?Sized,
    G: Generator + ?Sized,
    Cl: Clock + ?Sized,
{
    pub fn new(source: Arc<S>, generator: Arc<G>, clock: Arc<Cl>, config: PipelineConfig) -> Self {
        Self {
            source,
            drafter: GenerateUseCase::new(generator),
            clock,
            config,
        }
    }

    /// Run the full pipeline for one URL.
    pub async fn run(
        &self,
        url: &str,
        preferences: &ContentPreferences,
    ) -> Result<GenerationRun, PipelineError> {
        validate_url(url)?;

        let content = self.source.fetch(url).await?;

        tracing::info!(
            url = %content.url,
            title = %content.title,
            content_chars = content.body.chars().count(),
            "Extracted page content"
        );

        let results: Vec<PlatformResult> = stream::iter(self.config.platforms.iter().copied())
            .map(|platform| {
                let content = &content;
                async move {
                    match self.drafter.draft(content, platform, preferences).await {
                        Ok(post) => PlatformResult::Drafted(post),
                        Err(e) => {
                            tracing::error!(platform = %platform, error = %e, "Draft failed");
                            PlatformResult::Failed {
                                platform,
                                error: e.to_string(),
                            }
                        }
                    }
                }
            })
            .buffered(self.config.max_concurrent.max(1))
            .collect()
            .await;

        Ok(GenerationRun {
            url: url.to_string(),
            preferences: preferences.clone(),
            generated_at: self.clock.now(),
            results,
        })
    }
}

/// A usable URL needs an http(s) scheme and a host.
fn validate_url(url: &str) -> Result<(), PipelineError> {
    let parsed =
        Url::parse(url).map_err(|e| PipelineError::InvalidUrl(format!("{url}: {e}")))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(PipelineError::InvalidUrl(format!(
            "{url}: unsupported scheme '{}'",
            parsed.scheme()
        )));
    }

    if parsed.host_str().is_none() {
        return Err(PipelineError::InvalidUrl(format!("{url}: missing host")));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GenerationRequest, WebsiteContent};
    use crate::ports::GenerateError;
    use async_trait::async_trait;
    use time::OffsetDateTime;

    fn fixed_time() -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp(1_717_243_200).expect("valid timestamp")
    }

    struct FakeSource;

    #[async_trait]
    impl ContentSource for FakeSource {
        async fn fetch(&self, url: &str) -> Result<WebsiteContent, FetchError> {
            Ok(WebsiteContent {
                title: "A Page".to_string(),
                description: "About things".to_string(),
                body: "Page body".to_string(),
                url: url.to_string(),
            })
        }
    }

    /// Generator that fails for one platform and echoes for the rest
    struct FlakyGenerator {
        fail_on: Option<Platform>,
    }

    #[async_trait]
    impl Generator for FlakyGenerator {
        async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerateError> {
            if self.fail_on == Some(request.platform) {
                return Err(GenerateError::Api("boom".to_string()));
            }
            Ok(format!(
                "Post for {} about {} #demo",
                request.platform, request.content.title
            ))
        }
    }

    struct FixedClock(OffsetDateTime);

    impl Clock for FixedClock {
        fn now(&self) -> OffsetDateTime {
            self.0
        }
    }

    fn pipeline(
        fail_on: Option<Platform>,
        platforms: Vec<Platform>,
    ) -> Pipeline<FakeSource, FlakyGenerator, FixedClock> {
        Pipeline::new(
            Arc::new(FakeSource),
            Arc::new(FlakyGenerator { fail_on }),
            Arc::new(FixedClock(fixed_time())),
            PipelineConfig {
                platforms,
                max_concurrent: 2,
            },
        )
    }

    #[tokio::test]
    async fn test_run_preserves_platform_order() {
        let run = pipeline(None, Platform::ALL.to_vec())
            .run("https://example.com", &ContentPreferences::default())
            .await
            .unwrap();

        let order: Vec<Platform> = run.results.iter().map(|r| r.platform()).collect();
        assert_eq!(order, Platform::ALL.to_vec());
        assert_eq!(run.posts().count(), 4);
    }

    #[tokio::test]
    async fn test_one_platform_failure_does_not_abort_others() {
        let run = pipeline(
            Some(Platform::Facebook),
            vec![Platform::Twitter, Platform::Facebook, Platform::Instagram],
        )
        .run("https://example.com", &ContentPreferences::default())
        .await
        .unwrap();

        assert_eq!(run.posts().count(), 2);
        let failures: Vec<_> = run.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, Platform::Facebook);
        assert!(failures[0].1.contains("boom"));
    }

    #[tokio::test]
    async fn test_run_stamps_clock_time() {
        let run = pipeline(None, vec![Platform::Twitter])
            .run("https://example.com", &ContentPreferences::default())
            .await
            .unwrap();

        assert_eq!(run.generated_at, fixed_time());
    }

    #[tokio::test]
    async fn test_rejects_invalid_urls() {
        let p = pipeline(None, vec![Platform::Twitter]);

        for bad in ["not a url", "ftp://example.com/file", "https://"] {
            let err = p.run(bad, &ContentPreferences::default()).await;
            assert!(
                matches!(err, Err(PipelineError::InvalidUrl(_))),
                "expected InvalidUrl for {bad}"
            );
        }
    }
}
