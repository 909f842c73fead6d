//! Content coordinator agent.
//!
//! The fan-in step: runs once both specialists have answered, and turns
//! their outputs into one jointly consistent strategy.

use super::briefing::Briefing;
use super::{GenerationError, Generator};

const COORDINATOR_SYSTEM_PROMPT: &str = "\
You are a content coordination specialist.

Your role:
- Make the story and feed recommendations work together strategically
- Create content synergy (a story that teases the feed post, a feed post that drives to story highlights)
- Balance immediate engagement (stories) with long-term reach (feed)
- Point out cross-promotion opportunities between story and feed
- Avoid redundant themes between the two recommendations

Finish with one complete next-post strategy covering both the story and the feed post.";

/// Reconciles the two specialist outputs.
pub struct ContentCoordinator;

impl ContentCoordinator {
    /// Produce the joint recommendation from both specialist outputs.
    pub async fn coordinate(
        generator: &dyn Generator,
        story_recommendation: &str,
        feed_recommendation: &str,
        briefing: &Briefing,
    ) -> Result<String, GenerationError> {
        let user = format!(
            "{}\n\
             The story specialist recommends:\n{story_recommendation}\n\n\
             The feed specialist recommends:\n{feed_recommendation}\n\n\
             As the coordinator: reconcile both into one strategy for the next \
             story and feed post.",
            briefing.render()
        );
        generator.generate(COORDINATOR_SYSTEM_PROMPT, &user).await
    }
}
