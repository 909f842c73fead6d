//! Post repository: the validation boundary in front of the store.
//!
//! Translates raw CLI input into validated post records, resolves
//! `days_ago` to absolute timestamps, and exposes the reads the
//! recommendation pipeline needs.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::info;

use crate::post::{Post, PostId, PostType, ValidationError};
use crate::store::analysis::ContentAnalysis;
use crate::store::embedding::FastEmbedder;
use crate::store::{PostStore, StoreError};

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("invalid post: {0}")]
    Validation(#[from] ValidationError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Sample posts for `quick-setup`: a small window-cleaning business
/// account with a realistic engagement spread.
const SAMPLE_POSTS: [(&str, &str, i64, &str, i64); 6] = [
    (
        "Epic storefront transformation! 3 hours of work for this amazing result",
        "satisfying_video",
        3200,
        "#windowcleaning,#satisfying,#transformation,#commercial",
        2,
    ),
    (
        "Pro tip Tuesday: Always start from the top and work your way down for streak-free results",
        "educational",
        1800,
        "#protip,#windowcleaning,#technique,#professional",
        5,
    ),
    (
        "March Special: 25% off first-time residential customers! Book this week only",
        "promotion",
        950,
        "#deal,#residential,#windowcleaning,#march",
        7,
    ),
    (
        "5 AM start at the downtown office complex. Early bird gets the crystal clear windows!",
        "behind_scenes",
        2100,
        "#earlybird,#commercial,#windowcleaning,#downtown",
        10,
    ),
    (
        "Before and After: This restaurant window hadn't been cleaned in 6 months!",
        "satisfying_video",
        4100,
        "#beforeafter,#restaurant,#windowcleaning,#satisfying",
        12,
    ),
    (
        "Why we use distilled water: It prevents mineral spots and gives that perfect finish",
        "educational",
        1400,
        "#education,#windowcleaning,#water,#professional",
        15,
    ),
];

/// Repository over a [`PostStore`].
pub struct PostRepository {
    store: PostStore,
}

impl PostRepository {
    /// Wrap an already-open store.
    pub fn new(store: PostStore) -> Self {
        Self { store }
    }

    /// Open the store under `dir` with the default embedding backend.
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let store = PostStore::open(dir.as_ref(), Arc::new(FastEmbedder::new())).await?;
        Ok(Self::new(store))
    }

    /// Validate and store one post.
    ///
    /// Fails with a validation error for an empty caption, an unknown post
    /// type, or negative engagement / days_ago; nothing is stored in that
    /// case. `days_ago` is resolved against the current time.
    pub async fn add(
        &mut self,
        caption: &str,
        post_type: &str,
        engagement: i64,
        hashtags: &str,
        days_ago: i64,
    ) -> Result<PostId, RepositoryError> {
        let post = Post::validated(caption, post_type, engagement, hashtags, days_ago, Utc::now())?;
        let id = self.store.add(post).await?;

        info!(post_id = %id, total = self.store.count(), "Added post");
        Ok(id)
    }

    /// Insert the fixed sample set; returns how many posts were added.
    pub async fn quick_setup(&mut self) -> Result<usize, RepositoryError> {
        for (caption, post_type, engagement, hashtags, days_ago) in SAMPLE_POSTS {
            self.add(caption, post_type, engagement, hashtags, days_ago)
                .await?;
        }
        Ok(SAMPLE_POSTS.len())
    }

    /// The most recent posts, newest first; empty on an empty store.
    pub fn recent(&self, limit: usize) -> Vec<Post> {
        self.store.recent(limit)
    }

    /// Number of stored posts.
    pub fn count(&self) -> usize {
        self.store.count()
    }

    /// Aggregate statistics over the whole history.
    pub fn analysis(&self) -> ContentAnalysis {
        ContentAnalysis::from_posts(&self.store.all())
    }

    /// Posts with engagement at or above the threshold, highest first.
    pub fn high_engagement(&self, min_engagement: u32) -> Vec<Post> {
        self.store.high_engagement(min_engagement)
    }

    /// All posts of one type.
    pub fn posts_by_type(&self, post_type: PostType) -> Vec<Post> {
        self.store.posts_by_type(post_type)
    }

    /// Posts most similar to the query text, best match first.
    pub async fn similar(&self, query: &str, limit: usize) -> Result<Vec<(Post, f32)>, StoreError> {
        self.store.search_similar(query, limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::HashEmbedder;
    use tempfile::TempDir;

    async fn open_repository(dir: &TempDir) -> PostRepository {
        let store = PostStore::open(dir.path(), Arc::new(HashEmbedder::new()))
            .await
            .unwrap();
        PostRepository::new(store)
    }

    #[tokio::test]
    async fn test_add_validates_before_storing() {
        let dir = TempDir::new().unwrap();
        let mut repository = open_repository(&dir).await;

        let result = repository.add("A reel", "reel", 100, "", 0).await;
        assert!(matches!(
            result,
            Err(RepositoryError::Validation(
                ValidationError::UnknownPostType(_)
            ))
        ));
        assert_eq!(repository.count(), 0);
    }

    #[tokio::test]
    async fn test_quick_setup_inserts_sample_set() {
        let dir = TempDir::new().unwrap();
        let mut repository = open_repository(&dir).await;

        let inserted = repository.quick_setup().await.unwrap();
        assert_eq!(inserted, SAMPLE_POSTS.len());
        assert_eq!(repository.count(), SAMPLE_POSTS.len());

        // Newest sample is the 2-days-ago storefront transformation.
        let recent = repository.recent(1);
        assert!(recent[0].caption.starts_with("Epic storefront"));
    }

    #[tokio::test]
    async fn test_analysis_covers_whole_history() {
        let dir = TempDir::new().unwrap();
        let mut repository = open_repository(&dir).await;
        repository.quick_setup().await.unwrap();

        let analysis = repository.analysis();
        assert_eq!(analysis.total_posts, SAMPLE_POSTS.len());
        assert_eq!(analysis.type_distribution[&PostType::SatisfyingVideo], 2);
        assert_eq!(
            analysis.top_performing_type(),
            Some(PostType::SatisfyingVideo)
        );
    }
}
