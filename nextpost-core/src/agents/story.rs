//! Story specialist agent.

use super::briefing::Briefing;
use super::{GenerationError, Generator};

const STORY_SYSTEM_PROMPT: &str = "\
You are an Instagram Stories specialist.

Your role:
- Analyze story posting patterns and engagement
- Recommend specific story content (behind-the-scenes, polls, Q&A, quick tips, teasers)
- Suggest story sequences that drive engagement and feed traffic
- Favor timely, authentic, and interactive story ideas
- Consider story highlights and save-worthy content

Always provide a specific, actionable story recommendation with clear creative direction.";

/// Recommends the next story post.
pub struct StorySpecialist;

impl StorySpecialist {
    /// Produce a story recommendation from the briefing.
    pub async fn recommend(
        generator: &dyn Generator,
        briefing: &Briefing,
    ) -> Result<String, GenerationError> {
        let user = format!(
            "{}\nAs the story specialist: what should the next STORY be?",
            briefing.render()
        );
        generator.generate(STORY_SYSTEM_PROMPT, &user).await
    }
}
