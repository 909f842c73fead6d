//! Recommendation session orchestration.
//!
//! Owns the repository and the generator, and runs the pipeline:
//! briefing, fan-out to the two specialists, fan-in through the
//! coordinator. The fan-out is concurrent; the coordinator strictly waits
//! for both specialists, which is the pipeline's one synchronization
//! point. If any agent fails the whole run fails; there are no partial
//! results.

use std::sync::Arc;

use chrono::Utc;
use futures::try_join;
use thiserror::Error;
use tracing::info;

use crate::agents::briefing::Briefing;
use crate::agents::coordinator::ContentCoordinator;
use crate::agents::feed::FeedSpecialist;
use crate::agents::story::StorySpecialist;
use crate::agents::{GenerationError, Generator, OpenAiGenerator};
use crate::config::{ConfigError, RecommenderConfig};
use crate::repository::PostRepository;
use crate::store::analysis::{content_gaps, posting_rhythm};
use crate::store::StoreError;

/// Similar posts pulled into the briefing when a context is given.
const SIMILAR_LIMIT: usize = 3;

/// Errors from the recommendation pipeline.
#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("no posts stored yet - add posts or run quick-setup first")]
    NoHistory,
}

/// The pipeline's final output.
#[derive(Debug, Clone)]
pub struct Recommendation {
    /// Story specialist output.
    pub story: String,

    /// Feed specialist output.
    pub feed: String,

    /// Coordinator output reconciling the two.
    pub coordinated: String,
}

/// A recommendation session over one post store.
pub struct Recommender {
    config: RecommenderConfig,
    repository: PostRepository,
    generator: Arc<dyn Generator>,
}

impl Recommender {
    /// Open the store and wire up the OpenAI-backed pipeline.
    pub async fn connect(config: RecommenderConfig) -> Result<Self, RecommendError> {
        let repository = PostRepository::open(&config.store_dir).await?;

        let mut client = openai::OpenAi::new(&config.api_key).with_model(&config.model);
        if let Some(ref api_url) = config.api_url {
            client = client.with_base_url(api_url);
        }
        let generator = Arc::new(
            OpenAiGenerator::new(client)
                .with_temperature(config.temperature)
                .with_max_tokens(config.max_tokens),
        );

        Ok(Self::with_parts(config, repository, generator))
    }

    /// Assemble a session from existing parts. Tests use this to inject a
    /// scripted generator and store.
    pub fn with_parts(
        config: RecommenderConfig,
        repository: PostRepository,
        generator: Arc<dyn Generator>,
    ) -> Self {
        Self {
            config,
            repository,
            generator,
        }
    }

    /// The underlying repository.
    pub fn repository(&self) -> &PostRepository {
        &self.repository
    }

    /// Mutable access to the underlying repository.
    pub fn repository_mut(&mut self) -> &mut PostRepository {
        &mut self.repository
    }

    /// Run the full pipeline and return the three recommendations.
    pub async fn recommend(
        &self,
        context: Option<&str>,
    ) -> Result<Recommendation, RecommendError> {
        if self.repository.count() == 0 {
            return Err(RecommendError::NoHistory);
        }

        let briefing = self.build_briefing(context).await?;

        info!(
            posts = self.repository.count(),
            has_context = context.is_some(),
            "Running specialist fan-out"
        );

        let (story, feed) = try_join!(
            StorySpecialist::recommend(self.generator.as_ref(), &briefing),
            FeedSpecialist::recommend(self.generator.as_ref(), &briefing),
        )?;

        let coordinated =
            ContentCoordinator::coordinate(self.generator.as_ref(), &story, &feed, &briefing)
                .await?;

        Ok(Recommendation {
            story,
            feed,
            coordinated,
        })
    }

    async fn build_briefing(&self, context: Option<&str>) -> Result<Briefing, RecommendError> {
        let now = Utc::now();
        let recent = self.repository.recent(self.config.recent_window);
        let analysis = self.repository.analysis();
        let top_performers = self
            .repository
            .high_engagement(self.config.min_top_engagement);
        let gaps = content_gaps(&recent);
        let rhythm = posting_rhythm(&recent, now);

        let context = context.map(str::trim).filter(|c| !c.is_empty());
        let similar = match context {
            Some(query) => self.repository.similar(query, SIMILAR_LIMIT).await?,
            None => Vec::new(),
        };

        Ok(Briefing {
            context: context.map(String::from),
            analysis,
            recent,
            top_performers,
            gaps,
            rhythm,
            similar,
            generated_at: now,
        })
    }
}
