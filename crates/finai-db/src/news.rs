//! Database operations for the `news` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// A row from the `news` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct NewsRow {
    pub id: Uuid,
    pub title: String,
    pub summary: Option<String>,
    pub category: String,
    pub sentiment: Option<String>,
    pub published_at: DateTime<Utc>,
}

/// Most recent articles published at or after `since`, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_recent_news(
    pool: &PgPool,
    since: DateTime<Utc>,
    limit: i64,
) -> Result<Vec<NewsRow>, DbError> {
    let rows = sqlx::query_as::<_, NewsRow>(
        "SELECT id, title, summary, category, sentiment, published_at \
         FROM news \
         WHERE published_at >= $1 \
         ORDER BY published_at DESC, id \
         LIMIT $2",
    )
    .bind(since)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Stored sentiment labels of market, stocks, and economy articles since `since`.
///
/// Unlabelled articles are skipped.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_market_news_sentiment(
    pool: &PgPool,
    since: DateTime<Utc>,
) -> Result<Vec<String>, DbError> {
    let labels = sqlx::query_scalar::<_, String>(
        "SELECT sentiment \
         FROM news \
         WHERE published_at >= $1 \
           AND category IN ('market', 'stocks', 'economy') \
           AND sentiment IS NOT NULL \
         ORDER BY published_at DESC",
    )
    .bind(since)
    .fetch_all(pool)
    .await?;

    Ok(labels)
}
