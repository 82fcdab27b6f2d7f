//! Platform adaptation - turns raw generated text into conformant posts
//!
//! The adapter is the last step before display or export: whatever the
//! generator produced, the returned [`Post`] is guaranteed to fit its
//! platform's character limit, with hashtags extracted, merged with any
//! user-supplied ones, and deduplicated.

use regex::Regex;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::model::{Platform, Post};

/// Marker appended to a truncated body; counts one character toward the limit
const ELLIPSIS: char = '\u{2026}';

/// Errors from the adaptation boundary
///
/// Both indicate a caller error, not a transient condition; over-length
/// input is handled by truncation and is never an error.
#[derive(Debug, Error)]
pub enum AdaptError {
    #[error("content is empty or whitespace-only")]
    EmptyContent,
    #[error("unknown platform: {0}")]
    UnknownPlatform(String),
}

/// Conformance rules checked by [`PlatformAdapter::validate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Violation {
    /// Body exceeds the platform character limit
    BodyOverLimit,
    /// A hashtag entry is not `#` followed by alphanumerics/underscores
    MalformedHashtag,
    /// Two hashtag entries are equal ignoring case
    DuplicateHashtag,
}

impl Violation {
    pub fn as_str(self) -> &'static str {
        match self {
            Violation::BodyOverLimit => "body_over_limit",
            Violation::MalformedHashtag => "malformed_hashtag",
            Violation::DuplicateHashtag => "duplicate_hashtag",
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a read-only conformance check; never mutates the post
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    pub passed: bool,
    pub violations: Vec<Violation>,
}

/// Stateless converter from raw generated text to platform-conformant posts
///
/// Pure and deterministic: identical inputs yield byte-identical posts,
/// and the adapter holds no mutable state, so it is safe to share across
/// concurrent tasks.
pub struct PlatformAdapter {
    hashtag_re: Regex,
}

impl Default for PlatformAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformAdapter {
    pub fn new() -> Self {
        Self {
            hashtag_re: Regex::new(r"#[A-Za-z0-9_]+").expect("hashtag pattern is valid"),
        }
    }

    /// Adapt raw generated text into a post for the target platform.
    ///
    /// Inline hashtags stay in the body and count toward the character
    /// budget; `custom_hashtags` (with or without a leading `#`) are merged
    /// into the hashtag list after the extracted ones. Over-length bodies
    /// are truncated at a word boundary with a trailing ellipsis.
    pub fn adapt(
        &self,
        raw_text: &str,
        platform: Platform,
        custom_hashtags: &[String],
    ) -> Result<Post, AdaptError> {
        if raw_text.trim().is_empty() {
            return Err(AdaptError::EmptyContent);
        }

        let limit = platform.spec().character_limit;

        let mut hashtags = self.extract_hashtags(raw_text);
        merge_custom_hashtags(&mut hashtags, custom_hashtags);

        let (body, truncated) = truncate_to_limit(raw_text, limit);

        enforce_hashtag_budget(&mut hashtags, &body, limit);

        Ok(Post {
            platform,
            body,
            hashtags,
            truncated,
        })
    }

    /// Check an existing post against the platform rules.
    pub fn validate(&self, post: &Post) -> ValidationResult {
        let mut violations = Vec::new();
        let limit = post.platform.spec().character_limit;

        if post.body.chars().count() > limit {
            violations.push(Violation::BodyOverLimit);
        }

        if post.hashtags.iter().any(|tag| !self.is_well_formed(tag)) {
            violations.push(Violation::MalformedHashtag);
        }

        let mut seen: Vec<String> = Vec::new();
        for tag in &post.hashtags {
            let lower = tag.to_lowercase();
            if seen.contains(&lower) {
                violations.push(Violation::DuplicateHashtag);
                break;
            }
            seen.push(lower);
        }

        ValidationResult {
            passed: violations.is_empty(),
            violations,
        }
    }

    /// Inline hashtags in order of first appearance, deduplicated
    /// case-insensitively with first-seen casing kept.
    fn extract_hashtags(&self, text: &str) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        let mut tags = Vec::new();
        for m in self.hashtag_re.find_iter(text) {
            let lower = m.as_str().to_lowercase();
            if !seen.contains(&lower) {
                seen.push(lower);
                tags.push(m.as_str().to_string());
            }
        }
        tags
    }

    fn is_well_formed(&self, tag: &str) -> bool {
        self.hashtag_re
            .find(tag)
            .is_some_and(|m| m.start() == 0 && m.end() == tag.len())
    }
}

/// Append custom hashtags not already present, preserving caller order.
/// A missing leading `#` is added; entries that still are not valid
/// hashtag tokens are skipped.
fn merge_custom_hashtags(tags: &mut Vec<String>, custom: &[String]) {
    for raw in custom {
        let Some(tag) = normalize_hashtag(raw) else {
            tracing::debug!(hashtag = %raw, "Skipping malformed custom hashtag");
            continue;
        };
        let lower = tag.to_lowercase();
        if !tags.iter().any(|t| t.to_lowercase() == lower) {
            tags.push(tag);
        }
    }
}

fn normalize_hashtag(raw: &str) -> Option<String> {
    let word = raw.trim().trim_start_matches('#');
    if word.is_empty() || !word.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }
    Some(format!("#{word}"))
}

/// Shorten `text` to at most `limit` characters, cutting at a word
/// boundary and appending an ellipsis. Character counts are Unicode
/// scalar values, not bytes.
fn truncate_to_limit(text: &str, limit: usize) -> (String, bool) {
    if text.chars().count() <= limit {
        return (text.to_string(), false);
    }

    // Reserve one character for the ellipsis marker.
    let budget = limit.saturating_sub(1);
    let cut = byte_offset_of_char(text, budget);
    let head = &text[..cut];

    // Only back off when the cut lands inside a word or hashtag token.
    let splits_token = text[cut..]
        .chars()
        .next()
        .is_some_and(|c| !c.is_whitespace());

    let kept = if splits_token {
        match head.rfind(char::is_whitespace) {
            Some(pos) => &head[..pos],
            // Single unbroken token longer than the limit: a hard cut is
            // the only way to satisfy the limit invariant.
            None => head,
        }
    } else {
        head
    };

    let mut body = kept.trim_end().to_string();
    body.push(ELLIPSIS);
    (body, true)
}

/// Byte offset of the nth character, or the full length if shorter.
fn byte_offset_of_char(text: &str, n: usize) -> usize {
    text.char_indices().nth(n).map_or(text.len(), |(i, _)| i)
}

/// Shrink the hashtag list until the body plus a trailing line of the
/// hashtags not already inline fits the limit. The list is trimmed from
/// the tail, so custom hashtags (appended last) are dropped before
/// extracted ones; hashtags inline in the body are never dropped.
fn enforce_hashtag_budget(tags: &mut Vec<String>, body: &str, limit: usize) {
    let body_chars = body.chars().count();
    let body_lower = body.to_lowercase();

    loop {
        let trailing: Vec<&String> = tags
            .iter()
            .filter(|t| !contains_hashtag_token(&body_lower, t))
            .collect();

        if trailing.is_empty() {
            return;
        }

        let block_chars: usize =
            trailing.iter().map(|t| t.chars().count()).sum::<usize>() + trailing.len() - 1;

        // One newline separates the body from the trailing hashtag line.
        if body_chars + 1 + block_chars <= limit {
            return;
        }

        let Some(idx) = tags
            .iter()
            .rposition(|t| !contains_hashtag_token(&body_lower, t))
        else {
            return;
        };
        let dropped = tags.remove(idx);
        tracing::debug!(hashtag = %dropped, "Dropping hashtag to fit character limit");
    }
}

/// Whether the body contains `tag` as a complete hashtag token, i.e. not
/// as a prefix of a longer tag. Expects a lowercased body.
fn contains_hashtag_token(body_lower: &str, tag: &str) -> bool {
    let tag_lower = tag.to_lowercase();
    let mut start = 0;
    while let Some(pos) = body_lower[start..].find(&tag_lower) {
        let end = start + pos + tag_lower.len();
        let next_is_word = body_lower[end..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_');
        if !next_is_word {
            return true;
        }
        start += pos + 1;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter() -> PlatformAdapter {
        PlatformAdapter::new()
    }

    fn tags(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_input_is_rejected() {
        let err = adapter()
            .adapt("", Platform::Twitter, &[])
            .unwrap_err();
        assert!(matches!(err, AdaptError::EmptyContent));

        let err = adapter()
            .adapt("   \n\t ", Platform::Twitter, &[])
            .unwrap_err();
        assert!(matches!(err, AdaptError::EmptyContent));
    }

    #[test]
    fn test_short_text_passes_through_unchanged() {
        let text = "A small release note. Read it now!";
        let post = adapter().adapt(text, Platform::Twitter, &[]).unwrap();

        assert_eq!(post.body, text);
        assert!(!post.truncated);
        assert!(post.hashtags.is_empty());
    }

    #[test]
    fn test_limit_invariant_holds_for_all_platforms() {
        let word = "word ".repeat(20000);
        for platform in Platform::ALL {
            let post = adapter().adapt(&word, platform, &[]).unwrap();
            assert!(
                post.body.chars().count() <= platform.spec().character_limit,
                "{platform} body over limit"
            );
        }
    }

    #[test]
    fn test_adapt_is_deterministic() {
        let text = "Launching today! #launch details inside ".repeat(30);
        let custom = tags(&["startup", "#AI"]);

        let a = adapter().adapt(&text, Platform::Twitter, &custom).unwrap();
        let b = adapter().adapt(&text, Platform::Twitter, &custom).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn test_truncation_happens_at_word_boundary() {
        // 300 chars of 9-char words ("abcdefgh ") with no hashtags
        let text = "abcdefgh ".repeat(34).trim_end().to_string();
        assert!(text.chars().count() >= 300);

        let post = adapter().adapt(&text, Platform::Twitter, &[]).unwrap();

        assert!(post.truncated);
        assert!(post.body.chars().count() <= 280);
        assert!(post.body.ends_with('\u{2026}'));

        // The kept text must be a prefix of the original ending on a word
        let kept = post.body.trim_end_matches('\u{2026}');
        assert!(text.starts_with(kept));
        assert_eq!(
            text[kept.len()..].chars().next(),
            Some(' '),
            "cut fell inside a word"
        );
    }

    #[test]
    fn test_truncation_counts_chars_not_bytes() {
        // Multi-byte chars: 300 copies of a 2-word pair with an accent
        let text = "café brûlée ".repeat(40);
        let post = adapter().adapt(&text, Platform::Twitter, &[]).unwrap();

        assert!(post.truncated);
        assert!(post.body.chars().count() <= 280);
    }

    #[test]
    fn test_single_unbroken_token_is_hard_cut() {
        let text = "a".repeat(400);
        let post = adapter().adapt(&text, Platform::Twitter, &[]).unwrap();

        assert!(post.truncated);
        assert!(post.body.chars().count() <= 280);
    }

    #[test]
    fn test_inline_hashtags_extracted_in_order() {
        let post = adapter()
            .adapt(
                "Big news #Launch today, more at #ai and #launch again",
                Platform::Linkedin,
                &[],
            )
            .unwrap();

        // Dedup is case-insensitive, first-seen casing wins
        assert_eq!(post.hashtags, tags(&["#Launch", "#ai"]));
    }

    #[test]
    fn test_custom_hashtags_merge_after_extracted() {
        let post = adapter()
            .adapt(
                "Check out our launch! #launch #ai",
                Platform::Linkedin,
                &tags(&["#startup"]),
            )
            .unwrap();

        assert_eq!(post.body, "Check out our launch! #launch #ai");
        assert_eq!(post.hashtags, tags(&["#launch", "#ai", "#startup"]));
        assert!(!post.truncated);
    }

    #[test]
    fn test_custom_hashtags_normalized_and_deduped() {
        let post = adapter()
            .adapt(
                "Shipping soon #release",
                Platform::Linkedin,
                &tags(&["rust", "#RELEASE", "bad tag", ""]),
            )
            .unwrap();

        // "rust" gains a '#', "#RELEASE" is a dup of "#release",
        // malformed entries are skipped
        assert_eq!(post.hashtags, tags(&["#release", "#rust"]));
    }

    #[test]
    fn test_hashtag_budget_drops_custom_before_extracted() {
        // Body of 270 chars on twitter leaves 10 chars of budget: the
        // trailing block must fit in 280 - 270 - 1 = 9 chars.
        let body = "x".repeat(270);
        let post = adapter()
            .adapt(
                &body,
                Platform::Twitter,
                &tags(&["#alpha", "#beta", "#gamma"]),
            )
            .unwrap();

        // "#alpha" alone is 6 chars; adding "#beta" would need 12.
        assert_eq!(post.hashtags, tags(&["#alpha"]));
        assert!(!post.truncated);
    }

    #[test]
    fn test_inline_hashtags_never_dropped_by_budget() {
        // Truncated body still contains #live; it must survive even
        // though nothing else fits.
        let mut text = "#live ".to_string();
        text.push_str(&"word ".repeat(80));
        let post = adapter()
            .adapt(&text, Platform::Twitter, &tags(&["#extra"]))
            .unwrap();

        assert!(post.truncated);
        assert!(post.hashtags.contains(&"#live".to_string()));
    }

    #[test]
    fn test_truncated_inline_hashtag_counts_as_trailing() {
        // #tail sits past the twitter cut, so after truncation it is no
        // longer inline and must fit the trailing budget or be dropped.
        let mut text = "word ".repeat(60);
        text.push_str("#tail");
        let post = adapter().adapt(&text, Platform::Twitter, &[]).unwrap();

        assert!(post.truncated);
        if post.hashtags.contains(&"#tail".to_string()) {
            let trailing_chars = 1 + "#tail".chars().count();
            assert!(post.body.chars().count() + trailing_chars <= 280);
        }
    }

    #[test]
    fn test_prefix_hashtag_is_not_counted_as_inline() {
        // Body has #launchday; merged list has #launch, which is NOT
        // inline (only a longer tag is) and so consumes trailing budget.
        let post = adapter()
            .adapt(
                "Here we go #launchday",
                Platform::Twitter,
                &tags(&["#launch"]),
            )
            .unwrap();

        assert_eq!(post.hashtags, tags(&["#launchday", "#launch"]));
        let trailing_chars = 1 + "#launch".chars().count();
        assert!(post.body.chars().count() + trailing_chars <= 280);
    }

    #[test]
    fn test_validate_passes_conformant_post() {
        let post = adapter()
            .adapt("All good here #fine", Platform::Twitter, &[])
            .unwrap();
        let result = adapter().validate(&post);

        assert!(result.passed);
        assert!(result.violations.is_empty());
    }

    #[test]
    fn test_validate_flags_violations() {
        let post = Post {
            platform: Platform::Twitter,
            body: "y".repeat(300),
            hashtags: tags(&["#ok", "#OK", "not-a-tag"]),
            truncated: false,
        };
        let result = adapter().validate(&post);

        assert!(!result.passed);
        assert!(result.violations.contains(&Violation::BodyOverLimit));
        assert!(result.violations.contains(&Violation::MalformedHashtag));
        assert!(result.violations.contains(&Violation::DuplicateHashtag));
    }

    #[test]
    fn test_violation_names_are_stable() {
        assert_eq!(Violation::BodyOverLimit.to_string(), "body_over_limit");
        assert_eq!(
            Violation::MalformedHashtag.to_string(),
            "malformed_hashtag"
        );
        assert_eq!(
            Violation::DuplicateHashtag.to_string(),
            "duplicate_hashtag"
        );
    }
}
