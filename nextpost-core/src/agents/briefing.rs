//! Briefing assembly for the agent pipeline.
//!
//! All three agents see the same account briefing; only their system
//! prompts differ. The briefing is rendered as sectioned text so that the
//! same struct drives prompts and tests.

use chrono::{DateTime, Utc};

use crate::post::Post;
use crate::store::analysis::{ContentAnalysis, ContentGaps, PostingRhythm, PostingStatus};

/// Recent posts listed in the briefing.
const RECENT_SHOWN: usize = 5;

/// Top performers listed in the briefing.
const TOP_SHOWN: usize = 3;

/// Hashtags listed in the briefing.
const HASHTAGS_SHOWN: usize = 5;

/// Everything the agents are told about the account.
#[derive(Debug, Clone)]
pub struct Briefing {
    /// Free-text context from the user, if any.
    pub context: Option<String>,
    pub analysis: ContentAnalysis,
    /// Recent posts, newest first.
    pub recent: Vec<Post>,
    /// High-engagement posts, highest first.
    pub top_performers: Vec<Post>,
    pub gaps: ContentGaps,
    pub rhythm: Option<PostingRhythm>,
    /// Past posts similar to the context, best match first.
    pub similar: Vec<(Post, f32)>,
    pub generated_at: DateTime<Utc>,
}

impl Briefing {
    /// Render the briefing as the prompt body shared by all agents.
    pub fn render(&self) -> String {
        let mut out = String::new();

        out.push_str("NEXT POST BRIEFING\n");
        out.push_str("==================\n\n");

        out.push_str(&format!(
            "Context: {}\n\n",
            self.context.as_deref().unwrap_or("Regular content planning")
        ));

        out.push_str("## Account Overview\n");
        out.push_str(&format!("- Total posts: {}\n", self.analysis.total_posts));
        out.push_str(&format!(
            "- Average engagement: {:.0}\n",
            self.analysis.avg_engagement
        ));
        if let Some(top_type) = self.analysis.top_performing_type() {
            out.push_str(&format!("- Top performing type: {top_type}\n"));
        }
        let mut distribution: Vec<_> = self.analysis.type_distribution.iter().collect();
        distribution.sort_by_key(|(post_type, _)| **post_type);
        for (post_type, count) in distribution {
            out.push_str(&format!("- {post_type}: {count} posts\n"));
        }
        out.push('\n');

        if !self.recent.is_empty() {
            out.push_str("## Recent Activity (newest first)\n");
            for post in self.recent.iter().take(RECENT_SHOWN) {
                out.push_str(&format!(
                    "- [{}] {} engagement, {} days ago: {}\n",
                    post.post_type,
                    post.engagement,
                    post.days_ago(self.generated_at),
                    post.caption_preview(80)
                ));
            }
            out.push('\n');
        }

        if !self.top_performers.is_empty() {
            out.push_str("## Top Performers\n");
            for post in self.top_performers.iter().take(TOP_SHOWN) {
                let tags: Vec<&str> = post.hashtags.iter().map(String::as_str).take(3).collect();
                out.push_str(&format!(
                    "- [{}] {} engagement ({}): {}\n",
                    post.post_type,
                    post.engagement,
                    tags.join(" "),
                    post.caption_preview(60)
                ));
            }
            out.push('\n');
        }

        out.push_str("## Content Gaps\n");
        if self.gaps.missing_types.is_empty() {
            out.push_str("- No content types missing recently\n");
        } else {
            for post_type in &self.gaps.missing_types {
                out.push_str(&format!("- Missing recently: {post_type}\n"));
            }
        }
        for post_type in &self.gaps.overused_types {
            out.push_str(&format!("- Overused recently: {post_type}\n"));
        }
        out.push('\n');

        if let Some(ref rhythm) = self.rhythm {
            out.push_str("## Posting Rhythm\n");
            out.push_str(&format!(
                "- Last post: {} days ago\n",
                rhythm.days_since_last
            ));
            out.push_str(&format!(
                "- Average gap: every {:.1} days\n",
                rhythm.avg_gap_days
            ));
            out.push_str(&format!(
                "- Status: {}\n\n",
                match rhythm.status {
                    PostingStatus::OnSchedule => "on schedule",
                    PostingStatus::Overdue => "overdue",
                }
            ));
        }

        if !self.analysis.best_performing_hashtags.is_empty() {
            out.push_str("## Best Hashtags\n");
            for (tag, avg) in self
                .analysis
                .best_performing_hashtags
                .iter()
                .take(HASHTAGS_SHOWN)
            {
                out.push_str(&format!("- {tag} (avg {avg:.0} engagement)\n"));
            }
            out.push('\n');
        }

        if !self.similar.is_empty() {
            out.push_str("## Past Posts Similar To The Current Context\n");
            for (post, score) in &self.similar {
                out.push_str(&format!(
                    "- [{}] {} engagement (similarity {:.2}): {}\n",
                    post.post_type,
                    post.engagement,
                    score,
                    post.caption_preview(60)
                ));
            }
            out.push('\n');
        }

        out.push_str(
            "TASK: Recommend the NEXT specific post for this account. Focus on \
             concrete content (not general strategy), timing that fits the posting \
             rhythm, and actionable creative direction.\n",
        );

        out
    }
}
