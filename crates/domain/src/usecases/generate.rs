//! Generation use case - one platform draft, generated then adapted

use std::sync::Arc;
use thiserror::Error;

use crate::{
    adapt::{AdaptError, PlatformAdapter},
    model::{ContentPreferences, GenerationRequest, Platform, Post, WebsiteContent},
    ports::{GenerateError, Generator},
};

/// Error produced while drafting a single platform post
#[derive(Debug, Error)]
pub enum DraftError {
    #[error(transparent)]
    Generate(#[from] GenerateError),
    #[error(transparent)]
    Adapt(#[from] AdaptError),
}

/// Use case for producing one conformant post per generator call
pub struct GenerateUseCase<G: ?Sized> {
    generator: Arc<G>,
    adapter: PlatformAdapter,
}

impl<G: Generator + ?Sized> GenerateUseCase<G> {
    pub fn new(generator: Arc<G>) -> Self {
        Self {
            generator,
            adapter: PlatformAdapter::new(),
        }
    }

    /// Generate raw text for one platform and adapt it into a [`Post`].
    pub async fn draft(
        &self,
        content: &WebsiteContent,
        platform: Platform,
        preferences: &ContentPreferences,
    ) -> Result<Post, DraftError> {
        tracing::info!(platform = %platform, url = %content.url, "Generating draft");

        let request = GenerationRequest {
            content: content.clone(),
            platform,
            preferences: preferences.clone(),
        };

        let raw = self.generator.generate(&request).await?;

        tracing::debug!(
            platform = %platform,
            raw_chars = raw.chars().count(),
            "Received raw draft"
        );

        let post = self.adapter.adapt(&raw, platform, &preferences.hashtags)?;

        if post.truncated {
            tracing::warn!(
                platform = %platform,
                limit = platform.spec().character_limit,
                "Draft exceeded platform limit and was truncated"
            );
        }

        Ok(post)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FakeGenerator {
        response: String,
    }

    #[async_trait]
    impl Generator for FakeGenerator {
        async fn generate(&self, _request: &GenerationRequest) -> Result<String, GenerateError> {
            Ok(self.response.clone())
        }
    }

    fn sample_content() -> WebsiteContent {
        WebsiteContent {
            title: "Release Notes".to_string(),
            description: "What changed this week".to_string(),
            body: "Lots of fixes.".to_string(),
            url: "https://example.com/notes".to_string(),
        }
    }

    #[tokio::test]
    async fn test_draft_adapts_generated_text() {
        let generator = Arc::new(FakeGenerator {
            response: "Fresh release is out! #release https://example.com/notes".to_string(),
        });
        let usecase = GenerateUseCase::new(generator);

        let post = usecase
            .draft(
                &sample_content(),
                Platform::Twitter,
                &ContentPreferences::default(),
            )
            .await
            .unwrap();

        assert_eq!(post.platform, Platform::Twitter);
        assert!(!post.truncated);
        assert_eq!(post.hashtags, vec!["#release".to_string()]);
    }

    #[tokio::test]
    async fn test_draft_truncates_over_length_response() {
        let generator = Arc::new(FakeGenerator {
            response: "long words here ".repeat(50),
        });
        let usecase = GenerateUseCase::new(generator);

        let post = usecase
            .draft(
                &sample_content(),
                Platform::Twitter,
                &ContentPreferences::default(),
            )
            .await
            .unwrap();

        assert!(post.truncated);
        assert!(post.body.chars().count() <= 280);
    }

    #[tokio::test]
    async fn test_draft_surfaces_empty_generation() {
        let generator = Arc::new(FakeGenerator {
            response: "   ".to_string(),
        });
        let usecase = GenerateUseCase::new(generator);

        let result = usecase
            .draft(
                &sample_content(),
                Platform::Twitter,
                &ContentPreferences::default(),
            )
            .await;

        assert!(matches!(
            result,
            Err(DraftError::Adapt(AdaptError::EmptyContent))
        ));
    }

    #[tokio::test]
    async fn test_draft_merges_preference_hashtags() {
        let generator = Arc::new(FakeGenerator {
            response: "New post about tooling #devtools".to_string(),
        });
        let usecase = GenerateUseCase::new(generator);

        let preferences = ContentPreferences {
            hashtags: vec!["rustlang".to_string()],
            ..Default::default()
        };

        let post = usecase
            .draft(&sample_content(), Platform::Linkedin, &preferences)
            .await
            .unwrap();

        assert_eq!(
            post.hashtags,
            vec!["#devtools".to_string(), "#rustlang".to_string()]
        );
    }
}
