//! Live integration tests for finai-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. `"../../migrations"` resolves to the workspace
//! migration directory.

use chrono::{Duration, Utc};
use finai_db::{
    get_user_record, list_candidate_courses, list_learning_progress, list_market_news_sentiment,
    list_recent_news, list_trading_activity,
};
use rust_decimal::Decimal;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn insert_user(pool: &sqlx::PgPool, email: &str) -> i64 {
    sqlx::query_scalar::<_, i64>("INSERT INTO users (email) VALUES ($1) RETURNING id")
        .bind(email)
        .fetch_one(pool)
        .await
        .unwrap_or_else(|e| panic!("insert_user failed for '{email}': {e}"))
}

async fn insert_course(pool: &sqlx::PgPool, title: &str, category: &str, status: &str) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO courses (title, category, level, language, status) \
         VALUES ($1, $2, 'beginner', 'en', $3) RETURNING id",
    )
    .bind(title)
    .bind(category)
    .bind(status)
    .fetch_one(pool)
    .await
    .unwrap_or_else(|e| panic!("insert_course failed for '{title}': {e}"))
}

async fn complete_course(pool: &sqlx::PgPool, user_id: i64, course_id: Uuid, score: i64) {
    sqlx::query(
        "INSERT INTO enrollments (user_id, course_id, completed_at) VALUES ($1, $2, NOW())",
    )
    .bind(user_id)
    .bind(course_id)
    .execute(pool)
    .await
    .expect("insert enrollment");

    sqlx::query(
        "INSERT INTO assessment_results (user_id, course_id, percentage) VALUES ($1, $2, $3)",
    )
    .bind(user_id)
    .bind(course_id)
    .bind(Decimal::from(score))
    .execute(pool)
    .await
    .expect("insert assessment");
}

async fn insert_news(
    pool: &sqlx::PgPool,
    title: &str,
    category: &str,
    sentiment: Option<&str>,
    hours_ago: i64,
) {
    sqlx::query(
        "INSERT INTO news (title, summary, category, sentiment, published_at) \
         VALUES ($1, 'summary', $2, $3, $4)",
    )
    .bind(title)
    .bind(category)
    .bind(sentiment)
    .bind(Utc::now() - Duration::hours(hours_ago))
    .execute(pool)
    .await
    .expect("insert news");
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn get_user_record_returns_none_for_unknown_user(pool: sqlx::PgPool) {
    let row = get_user_record(&pool, 9_999).await.expect("query");
    assert!(row.is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn get_user_record_joins_preferences(pool: sqlx::PgPool) {
    let user_id = insert_user(&pool, "prefs@example.com").await;
    sqlx::query(
        "INSERT INTO user_preferences (user_id, risk_profile, preferences) \
         VALUES ($1, 'aggressive', '{\"preferred_language\": \"en\"}'::jsonb)",
    )
    .bind(user_id)
    .execute(&pool)
    .await
    .expect("insert preferences");

    let row = get_user_record(&pool, user_id)
        .await
        .expect("query")
        .expect("user exists");
    assert_eq!(row.risk_profile.as_deref(), Some("aggressive"));
    assert_eq!(
        row.preferences.as_ref().and_then(|p| p["preferred_language"].as_str()),
        Some("en")
    );
}

// ---------------------------------------------------------------------------
// Learning + trading history
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn learning_progress_groups_by_category(pool: sqlx::PgPool) {
    let user_id = insert_user(&pool, "learner@example.com").await;
    let a = insert_course(&pool, "Stocks I", "stocks", "PUBLISHED").await;
    let b = insert_course(&pool, "Stocks II", "stocks", "PUBLISHED").await;
    let c = insert_course(&pool, "Bonds I", "bonds", "PUBLISHED").await;
    complete_course(&pool, user_id, a, 80).await;
    complete_course(&pool, user_id, b, 90).await;
    complete_course(&pool, user_id, c, 70).await;

    let rows = list_learning_progress(&pool, user_id).await.expect("query");
    assert_eq!(rows.len(), 2);
    let stocks = rows.iter().find(|r| r.category == "stocks").expect("stocks row");
    assert_eq!(stocks.completed_courses, 2);
    assert_eq!(stocks.avg_score, Some(Decimal::from(85)));
}

#[sqlx::test(migrations = "../../migrations")]
async fn trading_activity_counts_only_executed_trades(pool: sqlx::PgPool) {
    let user_id = insert_user(&pool, "trader@example.com").await;
    for (symbol, kind, status) in [
        ("BANKNIFTY", "BUY", "EXECUTED"),
        ("BANKNIFTY", "SELL", "EXECUTED"),
        ("ITC", "BUY", "EXECUTED"),
        ("ITC", "BUY", "CANCELLED"),
    ] {
        sqlx::query(
            "INSERT INTO trades (user_id, symbol, type, quantity, executed_price, status) \
             VALUES ($1, $2, $3, 10, 100, $4)",
        )
        .bind(user_id)
        .bind(symbol)
        .bind(kind)
        .bind(status)
        .execute(&pool)
        .await
        .expect("insert trade");
    }

    let rows = list_trading_activity(&pool, user_id).await.expect("query");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].symbol, "BANKNIFTY");
    assert_eq!(rows[0].trade_count, 2);
    assert_eq!(rows[0].buy_count, 1);
    assert_eq!(rows[0].sell_count, 1);
    assert_eq!(rows[1].trade_count, 1);
}

// ---------------------------------------------------------------------------
// Candidates
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn candidate_courses_exclude_completed_and_unpublished(pool: sqlx::PgPool) {
    let user_id = insert_user(&pool, "candidate@example.com").await;
    let done = insert_course(&pool, "Done", "stocks", "PUBLISHED").await;
    let open = insert_course(&pool, "Open", "stocks", "PUBLISHED").await;
    insert_course(&pool, "Draft", "stocks", "DRAFT").await;
    complete_course(&pool, user_id, done, 75).await;

    sqlx::query("INSERT INTO course_reviews (course_id, user_id, rating) VALUES ($1, $2, 4)")
        .bind(open)
        .bind(user_id)
        .execute(&pool)
        .await
        .expect("insert review");

    let rows = list_candidate_courses(&pool, user_id).await.expect("query");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, open);
    assert_eq!(rows[0].review_count, 1);
    assert_eq!(rows[0].avg_rating, Some(Decimal::from(4)));
}

#[sqlx::test(migrations = "../../migrations")]
async fn recent_news_respects_window_and_limit(pool: sqlx::PgPool) {
    insert_news(&pool, "fresh", "stocks", Some("positive"), 1).await;
    insert_news(&pool, "older", "stocks", Some("neutral"), 48).await;
    insert_news(&pool, "stale", "stocks", None, 24 * 10).await;

    let since = Utc::now() - Duration::days(7);
    let rows = list_recent_news(&pool, since, 100).await.expect("query");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].title, "fresh");

    let limited = list_recent_news(&pool, since, 1).await.expect("query");
    assert_eq!(limited.len(), 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn market_news_sentiment_filters_category_and_nulls(pool: sqlx::PgPool) {
    insert_news(&pool, "a", "market", Some("positive"), 1).await;
    insert_news(&pool, "b", "economy", Some("negative"), 2).await;
    insert_news(&pool, "c", "sports", Some("positive"), 2).await;
    insert_news(&pool, "d", "stocks", None, 2).await;

    let labels = list_market_news_sentiment(&pool, Utc::now() - Duration::days(1))
        .await
        .expect("query");
    assert_eq!(labels, vec!["positive".to_string(), "negative".to_string()]);
}
