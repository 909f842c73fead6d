//! Post records and the validation boundary.
//!
//! A [`Post`] describes one past social-media post: caption, type,
//! total engagement, hashtags, and when it was posted. Invalid input is
//! rejected here, before anything reaches the store.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors from validating post input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("caption must not be empty")]
    EmptyCaption,

    #[error(
        "unknown post type '{0}' (expected one of: satisfying_video, promotion, \
         educational, behind_scenes)"
    )]
    UnknownPostType(String),

    #[error("engagement must not be negative (got {0})")]
    NegativeEngagement(i64),

    #[error("days ago must not be negative (got {0})")]
    NegativeDaysAgo(i64),
}

/// Unique identifier for a stored post.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct PostId(Uuid);

impl PostId {
    /// Generate a fresh ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PostId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The closed set of content types the account posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostType {
    SatisfyingVideo,
    Promotion,
    Educational,
    BehindScenes,
}

impl PostType {
    /// All post types, in display order.
    pub const ALL: [PostType; 4] = [
        PostType::SatisfyingVideo,
        PostType::Promotion,
        PostType::Educational,
        PostType::BehindScenes,
    ];

    /// The wire/CLI name of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            PostType::SatisfyingVideo => "satisfying_video",
            PostType::Promotion => "promotion",
            PostType::Educational => "educational",
            PostType::BehindScenes => "behind_scenes",
        }
    }
}

impl fmt::Display for PostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "satisfying_video" => Ok(PostType::SatisfyingVideo),
            "promotion" => Ok(PostType::Promotion),
            "educational" => Ok(PostType::Educational),
            "behind_scenes" => Ok(PostType::BehindScenes),
            other => Err(ValidationError::UnknownPostType(other.to_string())),
        }
    }
}

/// One past post, as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub caption: String,
    pub post_type: PostType,
    pub engagement: u32,
    pub hashtags: BTreeSet<String>,
    pub posted_at: DateTime<Utc>,
}

impl Post {
    /// Validate raw input and build a post.
    ///
    /// `engagement` and `days_ago` arrive signed from the CLI; negative
    /// values are rejected rather than clamped. `posted_at` is resolved to
    /// an absolute timestamp relative to `now`.
    pub fn validated(
        caption: &str,
        post_type: &str,
        engagement: i64,
        hashtags: &str,
        days_ago: i64,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let caption = caption.trim();
        if caption.is_empty() {
            return Err(ValidationError::EmptyCaption);
        }

        let post_type = post_type.parse::<PostType>()?;

        if engagement < 0 {
            return Err(ValidationError::NegativeEngagement(engagement));
        }

        if days_ago < 0 {
            return Err(ValidationError::NegativeDaysAgo(days_ago));
        }

        Ok(Self {
            id: PostId::new(),
            caption: caption.to_string(),
            post_type,
            engagement: engagement as u32,
            hashtags: parse_hashtags(hashtags),
            posted_at: now - chrono::Duration::days(days_ago),
        })
    }

    /// Age of the post in whole days, relative to `now`.
    pub fn days_ago(&self, now: DateTime<Utc>) -> i64 {
        (now - self.posted_at).num_days()
    }

    /// The text that gets embedded for similarity search: caption plus
    /// hashtags, matching what the store indexes.
    pub fn embedding_text(&self) -> String {
        let mut text = self.caption.clone();
        for tag in &self.hashtags {
            text.push(' ');
            text.push_str(tag);
        }
        text
    }

    /// Caption truncated to `max` characters for briefing previews.
    pub fn caption_preview(&self, max: usize) -> String {
        if self.caption.chars().count() <= max {
            self.caption.clone()
        } else {
            let truncated: String = self.caption.chars().take(max).collect();
            format!("{truncated}...")
        }
    }
}

/// Parse a comma-separated hashtag list into a set.
///
/// Whitespace is trimmed and empty entries dropped; order is irrelevant.
pub fn parse_hashtags(input: &str) -> BTreeSet<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_type_parsing() {
        assert_eq!(
            "satisfying_video".parse::<PostType>().unwrap(),
            PostType::SatisfyingVideo
        );
        assert_eq!(
            "behind_scenes".parse::<PostType>().unwrap(),
            PostType::BehindScenes
        );
        assert_eq!(
            "reel".parse::<PostType>(),
            Err(ValidationError::UnknownPostType("reel".to_string()))
        );
    }

    #[test]
    fn test_post_type_roundtrip_through_str() {
        for post_type in PostType::ALL {
            assert_eq!(post_type.as_str().parse::<PostType>().unwrap(), post_type);
        }
    }

    #[test]
    fn test_validated_post() {
        let now = Utc::now();
        let post = Post::validated(
            "Epic storefront transformation!",
            "satisfying_video",
            3200,
            "#windowcleaning,#satisfying",
            2,
            now,
        )
        .unwrap();

        assert_eq!(post.caption, "Epic storefront transformation!");
        assert_eq!(post.post_type, PostType::SatisfyingVideo);
        assert_eq!(post.engagement, 3200);
        assert_eq!(post.hashtags.len(), 2);
        assert_eq!(post.days_ago(now), 2);
    }

    #[test]
    fn test_empty_caption_rejected() {
        let result = Post::validated("   ", "promotion", 100, "", 0, Utc::now());
        assert_eq!(result.unwrap_err(), ValidationError::EmptyCaption);
    }

    #[test]
    fn test_negative_engagement_rejected() {
        let result = Post::validated("A post", "promotion", -5, "", 0, Utc::now());
        assert_eq!(result.unwrap_err(), ValidationError::NegativeEngagement(-5));
    }

    #[test]
    fn test_negative_days_ago_rejected() {
        let result = Post::validated("A post", "promotion", 5, "", -1, Utc::now());
        assert_eq!(result.unwrap_err(), ValidationError::NegativeDaysAgo(-1));
    }

    #[test]
    fn test_hashtag_parsing() {
        let tags = parse_hashtags(" #one, #two ,,  ,#two");
        assert_eq!(tags.len(), 2);
        assert!(tags.contains("#one"));
        assert!(tags.contains("#two"));

        assert!(parse_hashtags("").is_empty());
    }

    #[test]
    fn test_caption_preview_truncation() {
        let now = Utc::now();
        let post = Post::validated("abcdefghij", "educational", 1, "", 0, now).unwrap();
        assert_eq!(post.caption_preview(20), "abcdefghij");
        assert_eq!(post.caption_preview(4), "abcd...");
    }

    #[test]
    fn test_embedding_text_includes_hashtags() {
        let now = Utc::now();
        let post =
            Post::validated("Clean windows", "educational", 1, "#tips,#clean", 0, now).unwrap();
        let text = post.embedding_text();
        assert!(text.starts_with("Clean windows"));
        assert!(text.contains("#tips"));
        assert!(text.contains("#clean"));
    }
}
