//! Feed specialist agent.

use super::briefing::Briefing;
use super::{GenerationError, Generator};

const FEED_SYSTEM_PROMPT: &str = "\
You are an Instagram Feed content specialist.

Your role:
- Analyze feed posting patterns, engagement, and content performance
- Recommend specific feed post content (satisfying videos, educational carousels, promotions, transformations)
- Suggest posting timing based on the historical data provided
- Favor high-engagement, algorithm-friendly content
- Balance content types against what the account has posted lately

Provide a detailed feed post recommendation with a hashtag strategy and caption direction.";

/// Recommends the next feed post.
pub struct FeedSpecialist;

impl FeedSpecialist {
    /// Produce a feed recommendation from the briefing.
    pub async fn recommend(
        generator: &dyn Generator,
        briefing: &Briefing,
    ) -> Result<String, GenerationError> {
        let user = format!(
            "{}\nAs the feed specialist: what should the next FEED POST be?",
            briefing.render()
        );
        generator.generate(FEED_SYSTEM_PROMPT, &user).await
    }
}
