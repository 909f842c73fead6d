//! Post history store and multi-agent next-post recommendation engine.
//!
//! This crate provides:
//! - A validated post record model and repository
//! - An embedded vector store over past posts (recency, filters,
//!   similarity search)
//! - Content analysis (engagement statistics, gaps, posting rhythm)
//! - A two-specialist + coordinator recommendation pipeline over the
//!   OpenAI API
//!
//! # Quick Start
//!
//! ```ignore
//! use nextpost_core::{Recommender, RecommenderConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RecommenderConfig::from_env()?.with_store_dir("./post_store");
//!
//!     let recommender = Recommender::connect(config).await?;
//!     let recommendation = recommender.recommend(Some("launching new service")).await?;
//!
//!     println!("{}", recommendation.coordinated);
//!     Ok(())
//! }
//! ```

pub mod agents;
pub mod config;
pub mod post;
pub mod recommender;
pub mod repository;
pub mod store;
pub mod testing;

// Primary public API
pub use agents::{GenerationError, Generator, OpenAiGenerator};
pub use config::{ConfigError, RecommenderConfig};
pub use post::{Post, PostId, PostType, ValidationError};
pub use recommender::{Recommendation, RecommendError, Recommender};
pub use repository::{PostRepository, RepositoryError};
pub use store::{PostStore, StoreError};
