//! Embedded post store with vector search.
//!
//! Plays the role a hosted vector database would: durable keyed storage of
//! post records, queryable by recency, metadata, and embedding similarity.
//! Persistence is a versioned JSON document under the store directory; the
//! layout is internal to this module, not a public contract.

pub mod analysis;
pub mod embedding;

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs;
use tracing::debug;

use crate::post::{Post, PostId, PostType};
use crate::store::embedding::{cosine_similarity, Embedder, EmbeddingError};

/// Current store format version.
const STORE_VERSION: u32 = 1;

/// File holding all records inside the store directory.
const STORE_FILE: &str = "posts.json";

/// Errors from store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("store version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },

    #[error("embedding error: {0}")]
    Embedding(#[from] EmbeddingError),
}

/// On-disk document: version header plus all records.
#[derive(Debug, Serialize, Deserialize)]
struct StoreDocument {
    version: u32,
    posts: Vec<StoredPost>,
}

/// A post together with its embedding vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredPost {
    post: Post,
    embedding: Vec<f32>,
}

/// The post store.
pub struct PostStore {
    dir: PathBuf,
    embedder: Arc<dyn Embedder>,
    records: Vec<StoredPost>,
}

impl PostStore {
    /// Open (or create) a store in the given directory.
    pub async fn open(
        dir: impl Into<PathBuf>,
        embedder: Arc<dyn Embedder>,
    ) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await?;

        let path = dir.join(STORE_FILE);
        let records = if path.exists() {
            let content = fs::read_to_string(&path).await?;
            let document: StoreDocument = serde_json::from_str(&content)?;

            if document.version != STORE_VERSION {
                return Err(StoreError::VersionMismatch {
                    expected: STORE_VERSION,
                    found: document.version,
                });
            }

            document.posts
        } else {
            Vec::new()
        };

        debug!(
            dir = %dir.display(),
            posts = records.len(),
            "Opened post store"
        );

        Ok(Self {
            dir,
            embedder,
            records,
        })
    }

    /// Embed and store a post, then flush to disk.
    pub async fn add(&mut self, post: Post) -> Result<PostId, StoreError> {
        let embedding = self.embedder.embed(&post.embedding_text()).await?;
        let id = post.id;

        self.records.push(StoredPost { post, embedding });
        self.flush().await?;

        debug!(post_id = %id, total = self.records.len(), "Stored post");
        Ok(id)
    }

    /// Number of stored posts.
    pub fn count(&self) -> usize {
        self.records.len()
    }

    /// All posts, in insertion order.
    pub fn all(&self) -> Vec<Post> {
        self.records.iter().map(|r| r.post.clone()).collect()
    }

    /// The most recent posts, newest first.
    ///
    /// An empty store yields an empty vec.
    pub fn recent(&self, limit: usize) -> Vec<Post> {
        let mut posts = self.all();
        posts.sort_by(|a, b| b.posted_at.cmp(&a.posted_at));
        posts.truncate(limit);
        posts
    }

    /// All posts of one type.
    pub fn posts_by_type(&self, post_type: PostType) -> Vec<Post> {
        self.records
            .iter()
            .filter(|r| r.post.post_type == post_type)
            .map(|r| r.post.clone())
            .collect()
    }

    /// Posts with engagement at or above the threshold, highest first.
    pub fn high_engagement(&self, min_engagement: u32) -> Vec<Post> {
        let mut posts: Vec<Post> = self
            .records
            .iter()
            .filter(|r| r.post.engagement >= min_engagement)
            .map(|r| r.post.clone())
            .collect();
        posts.sort_by(|a, b| b.engagement.cmp(&a.engagement));
        posts
    }

    /// Posts most similar to the query text, best match first.
    pub async fn search_similar(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<(Post, f32)>, StoreError> {
        if self.records.is_empty() {
            return Ok(Vec::new());
        }

        let query_embedding = self.embedder.embed(query).await?;

        let mut scored: Vec<(Post, f32)> = self
            .records
            .iter()
            .map(|r| {
                let score = cosine_similarity(&query_embedding, &r.embedding);
                (r.post.clone(), score)
            })
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit);
        Ok(scored)
    }

    async fn flush(&self) -> Result<(), StoreError> {
        let document = StoreDocument {
            version: STORE_VERSION,
            posts: self.records.clone(),
        };
        let content = serde_json::to_string_pretty(&document)?;
        fs::write(self.dir.join(STORE_FILE), content).await?;
        Ok(())
    }
}
