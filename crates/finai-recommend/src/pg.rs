//! Postgres-backed history and catalog sources.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::error::RecommendError;
use crate::profile::{CategoryProgress, LearningSource, SymbolActivity, UserRecord};
use crate::service::CatalogSource;
use crate::types::{CourseCandidate, NewsCandidate};

#[derive(Clone)]
pub struct PgSources {
    pool: PgPool,
}

impl PgSources {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn decimal_to_f64(value: Option<Decimal>) -> Option<f64> {
    value.and_then(|d| d.to_f64())
}

#[async_trait]
impl LearningSource for PgSources {
    async fn user_record(&self, user_id: i64) -> Result<Option<UserRecord>, RecommendError> {
        let row = finai_db::get_user_record(&self.pool, user_id).await?;
        Ok(row.map(|r| UserRecord {
            risk_profile: r.risk_profile,
        }))
    }

    async fn learning_progress(
        &self,
        user_id: i64,
    ) -> Result<Vec<CategoryProgress>, RecommendError> {
        let rows = finai_db::list_learning_progress(&self.pool, user_id).await?;
        Ok(rows
            .into_iter()
            .map(|r| CategoryProgress {
                category: r.category,
                completed_courses: r.completed_courses,
                avg_score: decimal_to_f64(r.avg_score),
            })
            .collect())
    }

    async fn trading_activity(&self, user_id: i64) -> Result<Vec<SymbolActivity>, RecommendError> {
        let rows = finai_db::list_trading_activity(&self.pool, user_id).await?;
        Ok(rows
            .into_iter()
            .map(|r| SymbolActivity {
                symbol: r.symbol,
                trade_count: r.trade_count,
            })
            .collect())
    }
}

#[async_trait]
impl CatalogSource for PgSources {
    async fn course_candidates(
        &self,
        user_id: i64,
    ) -> Result<Vec<CourseCandidate>, RecommendError> {
        let rows = finai_db::list_candidate_courses(&self.pool, user_id).await?;
        Ok(rows
            .into_iter()
            .map(|r| CourseCandidate {
                id: r.id.to_string(),
                title: r.title,
                description: r.description,
                category: r.category,
                level: r.level,
                language: r.language,
                created_at: r.created_at,
                avg_rating: decimal_to_f64(r.avg_rating),
                review_count: r.review_count,
            })
            .collect())
    }

    async fn recent_news(
        &self,
        since: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<NewsCandidate>, RecommendError> {
        let rows = finai_db::list_recent_news(&self.pool, since, limit).await?;
        Ok(rows
            .into_iter()
            .map(|r| NewsCandidate {
                id: r.id.to_string(),
                title: r.title,
                summary: r.summary,
                category: r.category,
                sentiment: r.sentiment,
                published_at: r.published_at,
            })
            .collect())
    }
}
