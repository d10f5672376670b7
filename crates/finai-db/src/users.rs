//! Database operations for `users` and `user_preferences`.

use serde_json::Value;
use sqlx::PgPool;

use crate::DbError;

/// A user joined with their (optional) preference row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecordRow {
    pub id: i64,
    pub risk_profile: Option<String>,
    pub investment_experience: Option<String>,
    pub preferences: Option<Value>,
}

/// Returns the user record with preferences, or `None` if the user does not exist.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_user_record(pool: &PgPool, user_id: i64) -> Result<Option<UserRecordRow>, DbError> {
    let row = sqlx::query_as::<_, UserRecordRow>(
        "SELECT u.id, up.risk_profile, up.investment_experience, up.preferences \
         FROM users u \
         LEFT JOIN user_preferences up ON up.user_id = u.id \
         WHERE u.id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
