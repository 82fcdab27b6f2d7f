//! Markdown post sink - writes a run to a timestamped file for reuse

use async_trait::async_trait;
use postforge_domain::model::{GenerationRun, PlatformResult};
use postforge_domain::ports::{ExportError, PostSink};
use std::path::PathBuf;
use tokio::fs;

/// Timestamp layout used in output filenames
const FILENAME_STAMP: &str = "[year][month][day]_[hour][minute][second]";

/// Human-readable timestamp inside the document
const DOCUMENT_STAMP: &str = "[year]-[month]-[day] [hour]:[minute]:[second]";

/// Sink that renders a run as markdown under an output directory
#[derive(Debug, Clone)]
pub struct MarkdownSink {
    output_dir: PathBuf,
}

impl MarkdownSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    fn render(run: &GenerationRun) -> Result<String, ExportError> {
        let stamp = time::format_description::parse(DOCUMENT_STAMP)
            .map_err(|e| ExportError::Format(e.to_string()))
            .and_then(|f| {
                run.generated_at
                    .format(&f)
                    .map_err(|e| ExportError::Format(e.to_string()))
            })?;

        let mut doc = String::new();
        doc.push_str("# Generated Social Media Posts\n\n");
        doc.push_str(&format!("**Source URL:** {}\n\n", run.url));
        doc.push_str(&format!("**Generated at:** {}\n\n", stamp));
        doc.push_str(&format!(
            "**Target Audience:** {}\n",
            run.preferences.audience
        ));
        doc.push_str(&format!("**Content Tone:** {}\n\n", run.preferences.tone));
        doc.push_str("## Generated Posts\n\n");

        for result in &run.results {
            match result {
                PlatformResult::Drafted(post) => {
                    doc.push_str(&format!("### {}\n\n", post.platform.display_name()));
                    doc.push_str("```\n");
                    doc.push_str(&post.body);
                    doc.push_str("\n```\n\n");
                    if !post.hashtags.is_empty() {
                        doc.push_str(&format!("**Hashtags:** {}\n\n", post.hashtags.join(" ")));
                    }
                    if post.truncated {
                        doc.push_str("_Truncated to fit the platform limit._\n\n");
                    }
                }
                PlatformResult::Failed { platform, error } => {
                    doc.push_str(&format!("### {}\n\n", platform.display_name()));
                    doc.push_str(&format!("_Generation failed: {}_\n\n", error));
                }
            }
        }

        Ok(doc)
    }
}

#[async_trait]
impl PostSink for MarkdownSink {
    async fn export(&self, run: &GenerationRun) -> Result<PathBuf, ExportError> {
        fs::create_dir_all(&self.output_dir).await?;

        let stamp = time::format_description::parse(FILENAME_STAMP)
            .map_err(|e| ExportError::Format(e.to_string()))
            .and_then(|f| {
                run.generated_at
                    .format(&f)
                    .map_err(|e| ExportError::Format(e.to_string()))
            })?;

        let path = self
            .output_dir
            .join(format!("social_media_posts_{}.md", stamp));

        fs::write(&path, Self::render(run)?).await?;

        tracing::info!(path = %path.display(), "Saved posts");

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use postforge_domain::model::{ContentPreferences, Platform, Post};
    use tempfile::TempDir;
    use time::OffsetDateTime;

    fn sample_run() -> GenerationRun {
        GenerationRun {
            url: "https://example.com".to_string(),
            preferences: ContentPreferences::default(),
            // 2024-06-01 12:00:00 UTC
            generated_at: OffsetDateTime::from_unix_timestamp(1_717_243_200).unwrap(),
            results: vec![
                PlatformResult::Drafted(Post {
                    platform: Platform::Twitter,
                    body: "A post body #demo".to_string(),
                    hashtags: vec!["#demo".to_string()],
                    truncated: false,
                }),
                PlatformResult::Failed {
                    platform: Platform::Linkedin,
                    error: "LLM API error: boom".to_string(),
                },
            ],
        }
    }

    #[tokio::test]
    async fn test_export_writes_timestamped_file() {
        let dir = TempDir::new().unwrap();
        let sink = MarkdownSink::new(dir.path());

        let path = sink.export(&sample_run()).await.unwrap();

        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "social_media_posts_20240601_120000.md"
        );

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("**Source URL:** https://example.com"));
        assert!(content.contains("### Twitter"));
        assert!(content.contains("A post body #demo"));
        assert!(content.contains("**Hashtags:** #demo"));
        assert!(content.contains("### LinkedIn"));
        assert!(content.contains("_Generation failed: LLM API error: boom_"));
    }

    #[tokio::test]
    async fn test_export_creates_missing_output_dir() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a/b");
        let sink = MarkdownSink::new(&nested);

        let path = sink.export(&sample_run()).await.unwrap();

        assert!(path.starts_with(&nested));
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_render_notes_truncation() {
        let mut run = sample_run();
        run.results = vec![PlatformResult::Drafted(Post {
            platform: Platform::Twitter,
            body: "Cut short\u{2026}".to_string(),
            hashtags: vec![],
            truncated: true,
        })];

        let doc = MarkdownSink::render(&run).unwrap();

        assert!(doc.contains("_Truncated to fit the platform limit._"));
    }
}
