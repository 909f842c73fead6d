//! Recommender configuration.
//!
//! Credentials and tuning are collected into one explicit object at
//! process start; nothing inside the pipeline reads the environment.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from building a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("OPENAI_API_KEY is not set - export it or add it to a .env file")]
    MissingApiKey,
}

/// Configuration for the recommendation pipeline.
#[derive(Debug, Clone)]
pub struct RecommenderConfig {
    /// OpenAI API key.
    pub api_key: String,

    /// Model for all three agents.
    pub model: String,

    /// Override the API base URL (for OpenAI-compatible servers).
    pub api_url: Option<String>,

    /// Sampling temperature.
    pub temperature: f32,

    /// Maximum tokens per agent response.
    pub max_tokens: u32,

    /// Directory holding the post store.
    pub store_dir: PathBuf,

    /// How many recent posts feed the briefing.
    pub recent_window: usize,

    /// Engagement threshold for "top performer" posts.
    pub min_top_engagement: u32,
}

impl RecommenderConfig {
    /// Build a configuration with defaults around the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: "gpt-4o-mini".to_string(),
            api_url: None,
            temperature: 0.7,
            max_tokens: 1024,
            store_dir: PathBuf::from("./post_store"),
            recent_window: 10,
            min_top_engagement: 1000,
        }
    }

    /// Build from the environment, failing fast when the credential is
    /// missing so no agent call is ever attempted without one.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| ConfigError::MissingApiKey)?;
        Ok(Self::new(api_key))
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = Some(api_url.into());
        self
    }

    pub fn with_store_dir(mut self, store_dir: impl Into<PathBuf>) -> Self {
        self.store_dir = store_dir.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RecommenderConfig::new("sk-test");
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.recent_window, 10);
        assert_eq!(config.min_top_engagement, 1000);
        assert_eq!(config.store_dir, PathBuf::from("./post_store"));
    }

    #[test]
    fn test_builder_overrides() {
        let config = RecommenderConfig::new("sk-test")
            .with_model("gpt-4o")
            .with_store_dir("/tmp/posts")
            .with_temperature(0.2);

        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.store_dir, PathBuf::from("/tmp/posts"));
        assert_eq!(config.temperature, 0.2);
    }

    // Exercises both from_env branches in one test to avoid racing other
    // tests over the process environment.
    #[test]
    fn test_from_env() {
        let previous = std::env::var("OPENAI_API_KEY").ok();

        std::env::remove_var("OPENAI_API_KEY");
        assert!(matches!(
            RecommenderConfig::from_env(),
            Err(ConfigError::MissingApiKey)
        ));

        std::env::set_var("OPENAI_API_KEY", "sk-test");
        let config = RecommenderConfig::from_env().unwrap();
        assert_eq!(config.api_key, "sk-test");

        match previous {
            Some(value) => std::env::set_var("OPENAI_API_KEY", value),
            None => std::env::remove_var("OPENAI_API_KEY"),
        }
    }
}
