//! QA tests for the recommendation pipeline.
//!
//! Uses the scripted `MockGenerator`, so these run without API calls and
//! verify the fan-out/fan-in structure: both specialists see the same
//! briefing, and the coordinator runs last with both outputs in hand.

use std::sync::Arc;

use nextpost_core::testing::{HashEmbedder, MockGenerator};
use nextpost_core::{
    PostRepository, PostStore, RecommendError, Recommender, RecommenderConfig,
};
use tempfile::TempDir;

async fn open_repository(dir: &TempDir) -> PostRepository {
    let store = PostStore::open(dir.path(), Arc::new(HashEmbedder::new()))
        .await
        .expect("Failed to open store");
    PostRepository::new(store)
}

fn scripted_generator() -> Arc<MockGenerator> {
    Arc::new(
        MockGenerator::new()
            .with_response("Stories specialist", "poll your followers about tomorrow's job")
            .with_response("Feed content specialist", "post the restaurant transformation")
            .with_response("coordination specialist", "tease the transformation in a story"),
    )
}

fn recommender(repository: PostRepository, generator: Arc<MockGenerator>) -> Recommender {
    Recommender::with_parts(RecommenderConfig::new("sk-test"), repository, generator)
}

#[tokio::test]
async fn test_empty_store_fails_with_no_history() {
    let dir = TempDir::new().unwrap();
    let repository = open_repository(&dir).await;
    let recommender = recommender(repository, scripted_generator());

    let result = recommender.recommend(None).await;
    assert!(matches!(result, Err(RecommendError::NoHistory)));
}

#[tokio::test]
async fn test_recommend_produces_all_three_sections() {
    let dir = TempDir::new().unwrap();
    let mut repository = open_repository(&dir).await;
    repository.quick_setup().await.unwrap();

    let generator = scripted_generator();
    let recommender = recommender(repository, generator);

    let recommendation = recommender.recommend(None).await.unwrap();
    assert_eq!(
        recommendation.story,
        "poll your followers about tomorrow's job"
    );
    assert_eq!(
        recommendation.feed,
        "post the restaurant transformation"
    );
    assert_eq!(
        recommendation.coordinated,
        "tease the transformation in a story"
    );
}

#[tokio::test]
async fn test_coordinator_runs_last_with_both_outputs() {
    let dir = TempDir::new().unwrap();
    let mut repository = open_repository(&dir).await;
    repository.quick_setup().await.unwrap();

    let generator = scripted_generator();
    let recommender = recommender(repository, generator.clone());

    recommender.recommend(None).await.unwrap();

    let calls = generator.calls();
    assert_eq!(calls.len(), 3);

    // The first two calls are the specialists, in either order.
    let specialist_systems: Vec<&str> =
        calls[..2].iter().map(|c| c.system.as_str()).collect();
    assert!(specialist_systems.iter().any(|s| s.contains("Stories")));
    assert!(specialist_systems.iter().any(|s| s.contains("Feed")));

    // The coordinator goes last and sees both specialist outputs.
    let coordinator = &calls[2];
    assert!(coordinator.system.contains("coordination specialist"));
    assert!(coordinator
        .user
        .contains("poll your followers about tomorrow's job"));
    assert!(coordinator
        .user
        .contains("post the restaurant transformation"));
}

#[tokio::test]
async fn test_specialists_share_the_same_briefing() {
    let dir = TempDir::new().unwrap();
    let mut repository = open_repository(&dir).await;
    repository.quick_setup().await.unwrap();

    let generator = scripted_generator();
    let recommender = recommender(repository, generator.clone());

    recommender.recommend(None).await.unwrap();

    let calls = generator.calls();
    for call in &calls[..2] {
        assert!(call.user.contains("NEXT POST BRIEFING"));
        assert!(call.user.contains("## Account Overview"));
        assert!(call.user.contains("Total posts: 6"));
    }
}

#[tokio::test]
async fn test_context_flows_into_every_prompt() {
    let dir = TempDir::new().unwrap();
    let mut repository = open_repository(&dir).await;
    repository.quick_setup().await.unwrap();

    let generator = scripted_generator();
    let recommender = recommender(repository, generator.clone());

    recommender
        .recommend(Some("launching new service"))
        .await
        .unwrap();

    for call in generator.calls() {
        assert!(call.user.contains("Context: launching new service"));
    }
}

#[tokio::test]
async fn test_context_pulls_similar_posts_into_briefing() {
    let dir = TempDir::new().unwrap();
    let mut repository = open_repository(&dir).await;
    repository.quick_setup().await.unwrap();

    let generator = scripted_generator();
    let recommender = recommender(repository, generator.clone());

    recommender
        .recommend(Some("residential customers special offer"))
        .await
        .unwrap();

    let calls = generator.calls();
    assert!(calls[0]
        .user
        .contains("## Past Posts Similar To The Current Context"));
}

#[tokio::test]
async fn test_specialist_failure_fails_the_whole_run() {
    let dir = TempDir::new().unwrap();
    let mut repository = open_repository(&dir).await;
    repository.quick_setup().await.unwrap();

    let generator = Arc::new(
        MockGenerator::new()
            .with_response("Stories specialist", "story idea")
            .with_failure("Feed content specialist", "quota exceeded"),
    );
    let recommender = recommender(repository, generator.clone());

    let result = recommender.recommend(None).await;
    assert!(matches!(result, Err(RecommendError::Generation(_))));

    // The coordinator never ran.
    let calls = generator.calls();
    assert!(calls
        .iter()
        .all(|c| !c.system.contains("coordination specialist")));
}
