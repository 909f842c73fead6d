//! Testing utilities.
//!
//! - [`MockGenerator`]: scripted agent responses without API calls
//! - [`HashEmbedder`]: deterministic embeddings without model downloads

use std::sync::Mutex;

use async_trait::async_trait;

use crate::agents::{GenerationError, Generator};
use crate::store::embedding::{Embedder, EmbeddingError};

/// One call received by the mock generator.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub system: String,
    pub user: String,
}

enum Scripted {
    Respond(String),
    Fail(String),
}

/// A generator that answers from a script.
///
/// Responses are keyed by a substring of the agent's system prompt, so
/// the fan-out order does not matter. Unmatched calls get a generic
/// response. All calls are recorded for assertions.
pub struct MockGenerator {
    scripted: Vec<(String, Scripted)>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self {
            scripted: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Respond with `response` to agents whose system prompt contains
    /// `matcher`.
    pub fn with_response(mut self, matcher: impl Into<String>, response: impl Into<String>) -> Self {
        self.scripted
            .push((matcher.into(), Scripted::Respond(response.into())));
        self
    }

    /// Fail calls from agents whose system prompt contains `matcher`.
    pub fn with_failure(mut self, matcher: impl Into<String>, message: impl Into<String>) -> Self {
        self.scripted
            .push((matcher.into(), Scripted::Fail(message.into())));
        self
    }

    /// All calls received so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Generator for MockGenerator {
    async fn generate(&self, system: &str, user: &str) -> Result<String, GenerationError> {
        self.calls.lock().unwrap().push(RecordedCall {
            system: system.to_string(),
            user: user.to_string(),
        });

        for (matcher, scripted) in &self.scripted {
            if system.contains(matcher.as_str()) {
                return match scripted {
                    Scripted::Respond(response) => Ok(response.clone()),
                    Scripted::Fail(message) => Err(GenerationError::Api(openai::Error::Api {
                        status: 500,
                        message: message.clone(),
                    })),
                };
            }
        }

        Ok("mock recommendation".to_string())
    }
}

/// Embedding dimension used by [`HashEmbedder`].
const HASH_DIM: usize = 64;

/// Deterministic bag-of-words embedder.
///
/// Each lowercase token is feature-hashed into a fixed-size vector, which
/// is then L2-normalized. Texts sharing words score higher under cosine
/// similarity, which is all the store tests need.
pub struct HashEmbedder;

impl HashEmbedder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

fn fnv1a(token: &str) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for byte in token.bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

#[async_trait]
impl Embedder for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut vector = vec![0.0f32; HASH_DIM];

        for token in text
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let index = (fnv1a(token) % HASH_DIM as u64) as usize;
            vector[index] += 1.0;
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }

        Ok(vector)
    }

    fn dimension(&self) -> usize {
        HASH_DIM
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::embedding::cosine_similarity;

    #[tokio::test]
    async fn test_hash_embedder_is_deterministic() {
        let embedder = HashEmbedder::new();
        let a = embedder.embed("clean windows shine").await.unwrap();
        let b = embedder.embed("clean windows shine").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_hash_embedder_ranks_overlapping_text_higher() {
        let embedder = HashEmbedder::new();
        let query = embedder.embed("window cleaning tips").await.unwrap();
        let related = embedder.embed("tips for window cleaning pros").await.unwrap();
        let unrelated = embedder.embed("quarterly revenue projections").await.unwrap();

        assert!(
            cosine_similarity(&query, &related) > cosine_similarity(&query, &unrelated)
        );
    }

    #[tokio::test]
    async fn test_mock_generator_matches_on_system_prompt() {
        let generator = MockGenerator::new()
            .with_response("Stories specialist", "story idea")
            .with_response("Feed content", "feed idea");

        let story = generator
            .generate("You are an Instagram Stories specialist.", "briefing")
            .await
            .unwrap();
        assert_eq!(story, "story idea");

        let other = generator.generate("Something else", "briefing").await.unwrap();
        assert_eq!(other, "mock recommendation");

        assert_eq!(generator.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_mock_generator_scripted_failure() {
        let generator = MockGenerator::new().with_failure("Feed content", "quota exceeded");

        let result = generator
            .generate("You are an Instagram Feed content specialist.", "briefing")
            .await;
        assert!(matches!(result, Err(GenerationError::Api(_))));
    }
}
