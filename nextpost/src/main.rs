//! Next-post recommender CLI.
//!
//! Stores your past posts in a local vector store and asks a three-agent
//! pipeline (story specialist, feed specialist, coordinator) what to post
//! next.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use nextpost_core::{PostRepository, Recommender, RecommenderConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "nextpost",
    about = "Get recommendations for your next story and feed post",
    version
)]
struct Cli {
    /// Directory holding the post store.
    #[arg(long, global = true, default_value = "./post_store")]
    store: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add one of your existing posts to the recommendation database.
    Add {
        /// Your post caption/description.
        caption: String,

        /// Type: satisfying_video, promotion, educational, behind_scenes.
        post_type: String,

        /// Total engagement (likes + comments + saves).
        #[arg(allow_negative_numbers = true)]
        engagement: i64,

        /// Comma-separated hashtags.
        #[arg(default_value = "")]
        hashtags: String,

        /// How many days ago this was posted.
        #[arg(default_value_t = 0, allow_negative_numbers = true)]
        days_ago: i64,
    },

    /// Insert sample posts to try the system immediately.
    QuickSetup,

    /// Get AI recommendations for your next story and feed post.
    Next {
        /// Current situation or goals (e.g. "launching new service").
        #[arg(long, default_value = "")]
        context: String,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Add {
            caption,
            post_type,
            engagement,
            hashtags,
            days_ago,
        } => {
            let mut repository = PostRepository::open(&cli.store).await?;
            repository
                .add(&caption, &post_type, engagement, &hashtags, days_ago)
                .await?;

            let preview: String = caption.chars().take(50).collect();
            println!("Added: '{preview}' ({engagement} engagement, {days_ago} days ago)");

            let total = repository.count();
            if total >= 3 {
                println!("You now have {total} posts. Try: nextpost next");
            }
        }

        Command::QuickSetup => {
            println!("Setting up sample window cleaning business posts...");

            let mut repository = PostRepository::open(&cli.store).await?;
            let inserted = repository.quick_setup().await?;

            println!("Added {inserted} sample posts!");
            println!("Now try: nextpost next");
            println!("Or add your real posts with: nextpost add");
        }

        Command::Next { context } => {
            // Fail fast on a missing credential, before any agent call.
            let config = RecommenderConfig::from_env()?.with_store_dir(&cli.store);
            info!(store = %cli.store.display(), "Opening post store");

            println!("Analyzing your content patterns...");
            let recommender = Recommender::connect(config).await?;

            println!("AI agents collaborating on your next posts...");
            let context = context.trim();
            let recommendation = recommender
                .recommend((!context.is_empty()).then_some(context))
                .await?;

            println!();
            println!("YOUR NEXT POSTS");
            println!("{}", "=".repeat(50));
            println!();
            println!("COORDINATED STRATEGY:");
            println!("{}", recommendation.coordinated.trim());
            println!();
            println!("STORY RECOMMENDATION:");
            println!("{}", recommendation.story.trim());
            println!();
            println!("FEED POST RECOMMENDATION:");
            println!("{}", recommendation.feed.trim());
            println!();
            println!("Ready to create your next posts!");
        }
    }

    Ok(())
}
