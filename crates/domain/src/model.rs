//! Domain models and value objects

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;

use crate::adapt::AdaptError;

/// Default target audience when the user supplies none
pub const DEFAULT_AUDIENCE: &str = "general professional audience";

/// Default tone of voice when the user supplies none
pub const DEFAULT_TONE: &str = "informative and engaging";

/// A supported social media platform
///
/// The set is closed: anything outside these four is rejected at parse
/// time with [`AdaptError::UnknownPlatform`] instead of falling through
/// to a partially supported target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Twitter,
    Linkedin,
    Facebook,
    Instagram,
}

/// Static per-platform constraints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformSpec {
    /// The platform this spec belongs to
    pub platform: Platform,
    /// Maximum post length in characters (Unicode scalar values)
    pub character_limit: usize,
}

const TWITTER_SPEC: PlatformSpec = PlatformSpec {
    platform: Platform::Twitter,
    character_limit: 280,
};

const LINKEDIN_SPEC: PlatformSpec = PlatformSpec {
    platform: Platform::Linkedin,
    character_limit: 3000,
};

const FACEBOOK_SPEC: PlatformSpec = PlatformSpec {
    platform: Platform::Facebook,
    character_limit: 63206,
};

const INSTAGRAM_SPEC: PlatformSpec = PlatformSpec {
    platform: Platform::Instagram,
    character_limit: 2200,
};

impl Platform {
    /// All supported platforms, in display order
    pub const ALL: [Platform; 4] = [
        Platform::Twitter,
        Platform::Linkedin,
        Platform::Facebook,
        Platform::Instagram,
    ];

    /// Look up the static spec for this platform
    pub fn spec(self) -> &'static PlatformSpec {
        match self {
            Platform::Twitter => &TWITTER_SPEC,
            Platform::Linkedin => &LINKEDIN_SPEC,
            Platform::Facebook => &FACEBOOK_SPEC,
            Platform::Instagram => &INSTAGRAM_SPEC,
        }
    }

    /// Canonical lowercase identifier (matches config/CLI input)
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Twitter => "twitter",
            Platform::Linkedin => "linkedin",
            Platform::Facebook => "facebook",
            Platform::Instagram => "instagram",
        }
    }

    /// Human-facing name for headings and display
    pub fn display_name(self) -> &'static str {
        match self {
            Platform::Twitter => "Twitter",
            Platform::Linkedin => "LinkedIn",
            Platform::Facebook => "Facebook",
            Platform::Instagram => "Instagram",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = AdaptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "twitter" => Ok(Platform::Twitter),
            "linkedin" => Ok(Platform::Linkedin),
            "facebook" => Ok(Platform::Facebook),
            "instagram" => Ok(Platform::Instagram),
            other => Err(AdaptError::UnknownPlatform(other.to_string())),
        }
    }
}

/// Content extracted from a web page by a [`crate::ports::ContentSource`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebsiteContent {
    /// Page title ("Untitled" when the source has none)
    pub title: String,
    /// Meta description or og:description, possibly empty
    pub description: String,
    /// Main page content as markdown
    pub body: String,
    /// Canonical URL of the page
    pub url: String,
}

/// User preferences for content generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentPreferences {
    /// Target audience for the posts
    pub audience: String,
    /// Desired tone of voice
    pub tone: String,
    /// Custom hashtags to merge into every post
    #[serde(default)]
    pub hashtags: Vec<String>,
}

impl Default for ContentPreferences {
    fn default() -> Self {
        Self {
            audience: DEFAULT_AUDIENCE.to_string(),
            tone: DEFAULT_TONE.to_string(),
            hashtags: vec![],
        }
    }
}

/// Input for one generation call, built per (URL, platform) pair
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Extracted page content, read-only to the generator
    pub content: WebsiteContent,
    /// Target platform
    pub platform: Platform,
    /// User preferences (audience, tone, custom hashtags)
    pub preferences: ContentPreferences,
}

/// A platform-conformant post produced by the adapter
///
/// Immutable once returned; `body` is guaranteed to fit the platform's
/// character limit, and `hashtags` carries the merged, deduplicated tag
/// list separately from the body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Target platform
    pub platform: Platform,
    /// Final post text, within the platform's character limit
    pub body: String,
    /// Merged hashtags, each starting with `#`, deduplicated
    pub hashtags: Vec<String>,
    /// True if the raw text exceeded the limit and was shortened
    pub truncated: bool,
}

/// Outcome for a single platform in a pipeline run
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PlatformResult {
    /// A conformant post was produced
    Drafted(Post),
    /// Generation or adaptation failed; other platforms are unaffected
    Failed { platform: Platform, error: String },
}

impl PlatformResult {
    /// The platform this result belongs to
    pub fn platform(&self) -> Platform {
        match self {
            PlatformResult::Drafted(post) => post.platform,
            PlatformResult::Failed { platform, .. } => *platform,
        }
    }
}

/// Result of one full pipeline run over a URL
#[derive(Debug, Clone, Serialize)]
pub struct GenerationRun {
    /// The source URL
    pub url: String,
    /// Preferences the run was generated with
    pub preferences: ContentPreferences,
    /// When the run completed
    #[serde(with = "time::serde::rfc3339")]
    pub generated_at: OffsetDateTime,
    /// Per-platform outcomes, in the requested platform order
    pub results: Vec<PlatformResult>,
}

impl GenerationRun {
    /// Iterate over the successfully drafted posts
    pub fn posts(&self) -> impl Iterator<Item = &Post> {
        self.results.iter().filter_map(|r| match r {
            PlatformResult::Drafted(post) => Some(post),
            PlatformResult::Failed { .. } => None,
        })
    }

    /// Iterate over failed platforms with their error messages
    pub fn failures(&self) -> impl Iterator<Item = (Platform, &str)> {
        self.results.iter().filter_map(|r| match r {
            PlatformResult::Failed { platform, error } => Some((*platform, error.as_str())),
            PlatformResult::Drafted(_) => None,
        })
    }
}
