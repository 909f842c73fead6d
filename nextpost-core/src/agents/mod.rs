//! The recommendation agents.
//!
//! Two specialists consume the same briefing and fan out independently:
//! - [`story::StorySpecialist`]: next Instagram story content
//! - [`feed::FeedSpecialist`]: next feed post content
//!
//! The [`coordinator::ContentCoordinator`] then reconciles both outputs
//! into one joint strategy. Each agent is a stateless request/response
//! call through the [`Generator`] seam; failures surface as
//! [`GenerationError`] without retries.

pub mod briefing;
pub mod coordinator;
pub mod feed;
pub mod story;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

/// Errors from agent generation.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("OpenAI API error: {0}")]
    Api(#[from] openai::Error),

    #[error("model returned an empty response")]
    EmptyResponse,
}

/// Seam between the agents and the language model.
///
/// Production uses [`OpenAiGenerator`]; tests script responses through
/// `testing::MockGenerator`.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, system: &str, user: &str) -> Result<String, GenerationError>;
}

/// Generator backed by the OpenAI Chat Completions API.
pub struct OpenAiGenerator {
    client: openai::OpenAi,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiGenerator {
    /// Wrap a configured client with default sampling settings.
    pub fn new(client: openai::OpenAi) -> Self {
        Self {
            client,
            temperature: 0.7,
            max_tokens: 1024,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

#[async_trait]
impl Generator for OpenAiGenerator {
    async fn generate(&self, system: &str, user: &str) -> Result<String, GenerationError> {
        let request = openai::Request::new(vec![openai::Message::user(user)])
            .with_system(system)
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens);

        let completion = self.client.complete(request).await?;
        let text = completion.text();

        if text.trim().is_empty() {
            return Err(GenerationError::EmptyResponse);
        }

        debug!(
            prompt_chars = user.len(),
            response_chars = text.len(),
            "Agent generation complete"
        );
        Ok(text)
    }
}
