mod api;
mod middleware;

use std::sync::Arc;

use finai_cache::{connect_store, ResultCache};
use finai_recommend::{PgSources, RecommendationService};
use finai_sentiment::SentimentEngine;
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState, RateLimits},
    middleware::AuthState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = finai_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool = finai_db::connect_from_config(&config).await?;
    finai_db::run_migrations(&pool).await?;

    let cache = ResultCache::new(connect_store(config.redis_url.as_deref()).await);
    let sentiment = SentimentEngine::from_config(&config, cache.clone())?;
    let sources = Arc::new(PgSources::new(pool.clone()));
    let recommendations = RecommendationService::new(sources.clone(), sources, cache);

    let auth = AuthState::from_env(matches!(
        config.env,
        finai_core::Environment::Development
    ))?;
    let limits = RateLimits::per_minute(
        config.rate_limit_sentiment_per_min,
        config.rate_limit_recommend_per_min,
    );
    let app = build_app(
        AppState {
            pool,
            sentiment: Arc::new(sentiment),
            recommendations: Arc::new(recommendations),
        },
        auth,
        limits,
    );

    tracing::info!(addr = %config.bind_addr, "finai-server listening");
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
