//! Embedding generation for vector search.
//!
//! Uses fastembed's all-MiniLM-L6-v2 model (384 dimensions). The model is
//! lazily initialized on first use; fastembed is synchronous, so embedding
//! runs on a blocking task.

use std::sync::Arc;

use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use once_cell::sync::OnceCell;
use thiserror::Error;
use tokio::task;
use tracing::{debug, info};

/// Dimension of the default embedding model.
pub const EMBEDDING_DIM: usize = 384;

/// Errors from embedding operations.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("failed to initialize embedding model: {0}")]
    ModelInit(String),

    #[error("failed to generate embedding: {0}")]
    Generation(String),

    #[error("blocking task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

/// Seam between the store and the embedding backend.
///
/// The store only needs "text in, vector out"; tests substitute a
/// deterministic implementation (see `testing::HashEmbedder`).
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    fn dimension(&self) -> usize;
}

/// Embedder backed by a local fastembed model.
pub struct FastEmbedder {
    model: OnceCell<Arc<TextEmbedding>>,
}

impl FastEmbedder {
    /// Create the embedder. The model is not loaded until the first call.
    pub fn new() -> Self {
        Self {
            model: OnceCell::new(),
        }
    }

    fn get_or_init_model(&self) -> Result<Arc<TextEmbedding>, EmbeddingError> {
        self.model
            .get_or_try_init(|| {
                info!(model = "all-MiniLM-L6-v2", "Initializing embedding model");
                let model =
                    TextEmbedding::try_new(InitOptions::new(EmbeddingModel::AllMiniLML6V2))
                        .map_err(|e| EmbeddingError::ModelInit(e.to_string()))?;
                Ok(Arc::new(model))
            })
            .cloned()
    }
}

impl Default for FastEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Embedder for FastEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let model = self.get_or_init_model()?;
        let text = text.to_string();

        let mut batch = task::spawn_blocking(move || {
            model
                .embed(vec![text], None)
                .map_err(|e| EmbeddingError::Generation(e.to_string()))
        })
        .await??;

        let embedding = batch
            .pop()
            .ok_or_else(|| EmbeddingError::Generation("empty embedding batch".to_string()))?;
        debug!(dimension = embedding.len(), "Generated embedding");
        Ok(embedding)
    }

    fn dimension(&self) -> usize {
        EMBEDDING_DIM
    }
}

/// Cosine similarity between two vectors.
///
/// Returns 0.0 when either vector has zero magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity_identical() {
        let v = vec![0.5, 0.5, 0.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_orthogonal() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        assert!(cosine_similarity(&a, &b).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_zero_vector() {
        let a = vec![0.0, 0.0];
        let b = vec![1.0, 1.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    // Downloads the model; run with: cargo test -- --ignored
    #[tokio::test]
    #[ignore = "downloads the embedding model from the network"]
    async fn test_fastembed_produces_vectors() {
        let embedder = FastEmbedder::new();
        let embedding = embedder.embed("Sparkling clean windows").await.unwrap();

        assert_eq!(embedding.len(), EMBEDDING_DIM);
        assert!(embedding.iter().any(|&x| x != 0.0));
    }

    // Downloads the model; run with: cargo test -- --ignored
    #[tokio::test]
    #[ignore = "downloads the embedding model from the network"]
    async fn test_similar_texts_score_higher() {
        let embedder = FastEmbedder::new();
        let a = embedder.embed("Window cleaning tips for pros").await.unwrap();
        let b = embedder.embed("How professionals clean windows").await.unwrap();
        let c = embedder.embed("Quantum physics is complex").await.unwrap();

        assert!(cosine_similarity(&a, &b) > cosine_similarity(&a, &c));
    }
}
