//! Learning and trading history aggregates used to build user profiles.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::DbError;

/// Completed-course aggregate for one category.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LearningProgressRow {
    pub category: String,
    pub completed_courses: i64,
    /// Mean assessment percentage for the category; `None` when no assessment
    /// was taken.
    pub avg_score: Option<Decimal>,
    pub first_completed_at: Option<DateTime<Utc>>,
}

/// Executed-trade aggregate for one symbol.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TradingActivityRow {
    pub symbol: String,
    pub trade_count: i64,
    pub buy_count: i64,
    pub sell_count: i64,
    pub avg_trade_size: Option<Decimal>,
}

/// Per-category completed-course counts and mean assessment scores.
///
/// Rows are ordered by the first completion in each category, so callers get
/// a stable first-seen order for tie-breaking.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_learning_progress(
    pool: &PgPool,
    user_id: i64,
) -> Result<Vec<LearningProgressRow>, DbError> {
    let rows = sqlx::query_as::<_, LearningProgressRow>(
        "SELECT c.category, \
                COUNT(DISTINCT e.course_id) AS completed_courses, \
                AVG(ar.percentage) AS avg_score, \
                MIN(e.completed_at) AS first_completed_at \
         FROM enrollments e \
         JOIN courses c ON c.id = e.course_id \
         LEFT JOIN assessment_results ar \
                ON ar.user_id = e.user_id AND ar.course_id = e.course_id \
         WHERE e.user_id = $1 AND e.completed_at IS NOT NULL \
         GROUP BY c.category \
         ORDER BY first_completed_at ASC, c.category ASC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Top 20 symbols by executed-trade count.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_trading_activity(
    pool: &PgPool,
    user_id: i64,
) -> Result<Vec<TradingActivityRow>, DbError> {
    let rows = sqlx::query_as::<_, TradingActivityRow>(
        "SELECT symbol, \
                COUNT(*) AS trade_count, \
                COUNT(*) FILTER (WHERE type = 'BUY') AS buy_count, \
                COUNT(*) FILTER (WHERE type = 'SELL') AS sell_count, \
                AVG(executed_price * quantity) AS avg_trade_size \
         FROM trades \
         WHERE user_id = $1 AND status = 'EXECUTED' \
         GROUP BY symbol \
         ORDER BY trade_count DESC, symbol ASC \
         LIMIT 20",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
