//! Postgres access for finai: pool setup, migrations, and the read queries
//! behind profile aggregation, candidate retrieval, and market sentiment.

use thiserror::Error;

pub mod courses;
pub mod history;
pub mod news;
mod pool;
pub mod users;

pub use courses::{list_candidate_courses, CourseCandidateRow};
pub use history::{
    list_learning_progress, list_trading_activity, LearningProgressRow, TradingActivityRow,
};
pub use news::{list_market_news_sentiment, list_recent_news, NewsRow};
pub use pool::{connect_from_config, connect_pool, health_check, run_migrations, PoolConfig};
pub use users::{get_user_record, UserRecordRow};

#[derive(Debug, Error)]
pub enum DbError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),
}
