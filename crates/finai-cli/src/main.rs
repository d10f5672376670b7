mod commands;

use clap::{Parser, Subcommand};
use finai_recommend::FeedbackType;
use finai_sentiment::ModelSelector;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "finai-cli")]
#[command(about = "Sentiment analysis and recommendation command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Analyze the sentiment of one text and print the verdict as JSON
    Sentiment {
        text: String,

        /// ensemble, vader, finbert or general
        #[arg(long, default_value = "ensemble")]
        model: ModelSelector,

        /// Attach named entities to the verdict
        #[arg(long)]
        entities: bool,
    },
    /// Print ranked recommendations for a user as JSON
    Recommend {
        user_id: i64,

        #[arg(long, default_value_t = 10)]
        limit: usize,

        /// Preferred course language, e.g. `en`
        #[arg(long)]
        language: Option<String>,
    },
    /// Record feedback on a recommended item
    Feedback {
        user_id: i64,
        item_id: String,

        /// like, dislike, view or complete
        feedback_type: FeedbackType,

        /// Rating between 0 and 5
        #[arg(long)]
        rating: Option<f64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let config = finai_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Migrate) => commands::run_migrate(&config).await,
        Some(Commands::Sentiment {
            text,
            model,
            entities,
        }) => commands::run_sentiment(&config, &text, model, entities).await,
        Some(Commands::Recommend {
            user_id,
            limit,
            language,
        }) => commands::run_recommend(&config, user_id, limit, language).await,
        Some(Commands::Feedback {
            user_id,
            item_id,
            feedback_type,
            rating,
        }) => commands::run_feedback(&config, user_id, &item_id, feedback_type, rating).await,
        None => {
            println!("finai-cli: run with --help to list commands");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests;
