//! Content pattern analysis over stored posts.
//!
//! Pure functions that turn post history into the aggregates the agents
//! are briefed with: engagement statistics, hashtag leaderboards, content
//! gaps, and posting rhythm.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::post::{Post, PostType};

/// Posts examined for gap analysis.
const GAP_WINDOW: usize = 7;

/// A type appearing this often within the window counts as overused.
const OVERUSE_THRESHOLD: usize = 3;

/// Hashtags must appear at least this often to rank by engagement.
const MIN_HASHTAG_USES: usize = 2;

/// A posting gap beyond this multiple of the average counts as overdue.
const OVERDUE_FACTOR: f64 = 1.5;

/// Aggregate statistics over the whole post history.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ContentAnalysis {
    pub total_posts: usize,
    pub avg_engagement: f64,
    pub type_distribution: HashMap<PostType, usize>,
    pub avg_engagement_by_type: HashMap<PostType, f64>,
    /// Hashtags by use count, most used first.
    pub top_hashtags: Vec<(String, usize)>,
    /// Hashtags used at least twice, by average engagement.
    pub best_performing_hashtags: Vec<(String, f64)>,
}

impl ContentAnalysis {
    /// Compute the analysis from all posts.
    pub fn from_posts(posts: &[Post]) -> Self {
        if posts.is_empty() {
            return Self::default();
        }

        let mut type_counts: HashMap<PostType, usize> = HashMap::new();
        let mut type_engagement: HashMap<PostType, Vec<u32>> = HashMap::new();
        let mut hashtag_counts: HashMap<String, usize> = HashMap::new();
        let mut hashtag_engagement: HashMap<String, Vec<u32>> = HashMap::new();
        let mut total_engagement: u64 = 0;

        for post in posts {
            *type_counts.entry(post.post_type).or_default() += 1;
            type_engagement
                .entry(post.post_type)
                .or_default()
                .push(post.engagement);

            for tag in &post.hashtags {
                *hashtag_counts.entry(tag.clone()).or_default() += 1;
                hashtag_engagement
                    .entry(tag.clone())
                    .or_default()
                    .push(post.engagement);
            }

            total_engagement += u64::from(post.engagement);
        }

        let avg_engagement_by_type = type_engagement
            .into_iter()
            .map(|(post_type, values)| (post_type, average(&values)))
            .collect();

        let mut top_hashtags: Vec<(String, usize)> = hashtag_counts.into_iter().collect();
        top_hashtags.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        top_hashtags.truncate(10);

        let mut best_performing_hashtags: Vec<(String, f64)> = hashtag_engagement
            .into_iter()
            .filter(|(_, values)| values.len() >= MIN_HASHTAG_USES)
            .map(|(tag, values)| (tag, average(&values)))
            .collect();
        best_performing_hashtags.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        best_performing_hashtags.truncate(10);

        Self {
            total_posts: posts.len(),
            avg_engagement: total_engagement as f64 / posts.len() as f64,
            type_distribution: type_counts,
            avg_engagement_by_type,
            top_hashtags,
            best_performing_hashtags,
        }
    }

    /// The post type with the highest average engagement, if any.
    pub fn top_performing_type(&self) -> Option<PostType> {
        self.avg_engagement_by_type
            .iter()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(post_type, _)| *post_type)
    }
}

/// What content types are missing or overrepresented lately.
#[derive(Debug, Clone, Serialize)]
pub struct ContentGaps {
    /// Type counts within the recent window.
    pub recent_mix: HashMap<PostType, usize>,
    /// Types absent from the window, in display order.
    pub missing_types: Vec<PostType>,
    /// Types at or above the overuse threshold.
    pub overused_types: Vec<PostType>,
}

/// Analyze the last few posts for content gaps.
///
/// Expects posts newest first; only the window is examined.
pub fn content_gaps(recent: &[Post]) -> ContentGaps {
    let window = &recent[..recent.len().min(GAP_WINDOW)];

    let mut recent_mix: HashMap<PostType, usize> = HashMap::new();
    for post in window {
        *recent_mix.entry(post.post_type).or_default() += 1;
    }

    let missing_types = PostType::ALL
        .into_iter()
        .filter(|t| !recent_mix.contains_key(t))
        .collect();

    let mut overused_types: Vec<PostType> = recent_mix
        .iter()
        .filter(|(_, &count)| count >= OVERUSE_THRESHOLD)
        .map(|(&post_type, _)| post_type)
        .collect();
    overused_types.sort();

    ContentGaps {
        recent_mix,
        missing_types,
        overused_types,
    }
}

/// Whether the account is posting on its usual cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PostingStatus {
    OnSchedule,
    Overdue,
}

/// Posting frequency derived from recent history.
#[derive(Debug, Clone, Serialize)]
pub struct PostingRhythm {
    pub days_since_last: i64,
    pub avg_gap_days: f64,
    pub status: PostingStatus,
}

/// Analyze posting frequency. Needs at least two posts; expects newest
/// first.
pub fn posting_rhythm(recent: &[Post], now: DateTime<Utc>) -> Option<PostingRhythm> {
    if recent.len() < 2 {
        return None;
    }

    let mut dates: Vec<DateTime<Utc>> = recent.iter().map(|p| p.posted_at).collect();
    dates.sort_by(|a, b| b.cmp(a));

    let days_since_last = (now - dates[0]).num_days();

    let gaps: Vec<i64> = dates
        .windows(2)
        .map(|pair| (pair[0] - pair[1]).num_days())
        .collect();
    let avg_gap_days = gaps.iter().sum::<i64>() as f64 / gaps.len() as f64;

    let status = if days_since_last as f64 > avg_gap_days * OVERDUE_FACTOR {
        PostingStatus::Overdue
    } else {
        PostingStatus::OnSchedule
    };

    Some(PostingRhythm {
        days_since_last,
        avg_gap_days,
        status,
    })
}

fn average(values: &[u32]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(|&v| f64::from(v)).sum::<f64>() / values.len() as f64
}
