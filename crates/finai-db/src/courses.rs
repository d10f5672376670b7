//! Course candidate queries.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// A published course the user has not completed, with review aggregates.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CourseCandidateRow {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub level: String,
    pub language: Option<String>,
    pub created_at: DateTime<Utc>,
    pub avg_rating: Option<Decimal>,
    pub review_count: i64,
}

/// Published courses not yet completed by `user_id`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_candidate_courses(
    pool: &PgPool,
    user_id: i64,
) -> Result<Vec<CourseCandidateRow>, DbError> {
    let rows = sqlx::query_as::<_, CourseCandidateRow>(
        "SELECT c.id, c.title, c.description, c.category, c.level, c.language, c.created_at, \
                AVG(cr.rating) AS avg_rating, \
                COUNT(cr.id) AS review_count \
         FROM courses c \
         LEFT JOIN course_reviews cr ON cr.course_id = c.id \
         WHERE c.status = 'PUBLISHED' \
           AND NOT EXISTS ( \
               SELECT 1 FROM enrollments e \
               WHERE e.course_id = c.id AND e.user_id = $1 AND e.completed_at IS NOT NULL \
           ) \
         GROUP BY c.id \
         ORDER BY c.created_at DESC, c.id",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
