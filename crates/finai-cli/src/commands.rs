//! Command handlers. Results are printed to stdout as pretty JSON.

use std::sync::Arc;

use finai_cache::{connect_store, ResultCache};
use finai_core::AppConfig;
use finai_db::connect_from_config;
use finai_recommend::{FeedbackType, PgSources, Preferences, RecommendationService};
use finai_sentiment::{ModelSelector, SentimentEngine};
use serde::Serialize;

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Shared Redis cache when configured, so feedback recorded here invalidates
/// the server's cached recommendations.
async fn cache(config: &AppConfig) -> ResultCache {
    ResultCache::new(connect_store(config.redis_url.as_deref()).await)
}

async fn recommendation_service(config: &AppConfig) -> anyhow::Result<RecommendationService> {
    let pool = connect_from_config(config).await?;
    let sources = Arc::new(PgSources::new(pool));
    Ok(RecommendationService::new(
        sources.clone(),
        sources,
        cache(config).await,
    ))
}

pub(crate) async fn run_migrate(config: &AppConfig) -> anyhow::Result<()> {
    let pool = connect_from_config(config).await?;
    let applied = finai_db::run_migrations(&pool).await?;
    println!("migrations applied: {applied}");
    Ok(())
}

pub(crate) async fn run_sentiment(
    config: &AppConfig,
    text: &str,
    selector: ModelSelector,
    include_entities: bool,
) -> anyhow::Result<()> {
    let engine = SentimentEngine::from_config(config, cache(config).await)?;
    let verdict = engine.analyze(text, include_entities, selector).await?;
    print_json(&verdict)
}

pub(crate) async fn run_recommend(
    config: &AppConfig,
    user_id: i64,
    limit: usize,
    language: Option<String>,
) -> anyhow::Result<()> {
    let service = recommendation_service(config).await?;
    let preferences = Preferences {
        preferred_language: language,
    };
    let set = service
        .get_recommendations(user_id, &preferences, limit)
        .await?;
    print_json(&set)
}

pub(crate) async fn run_feedback(
    config: &AppConfig,
    user_id: i64,
    item_id: &str,
    feedback_type: FeedbackType,
    rating: Option<f64>,
) -> anyhow::Result<()> {
    let service = recommendation_service(config).await?;
    let event = service
        .record_feedback(user_id, item_id, feedback_type, rating)
        .await?;
    print_json(&event)
}
