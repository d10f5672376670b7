//! Offline unit tests for finai-db pool configuration and row types.
//! These tests do not require a live database connection.

use finai_core::{AppConfig, Environment};
use finai_db::{CourseCandidateRow, LearningProgressRow, PoolConfig};
use rust_decimal::Decimal;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let app_config = AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000),
        log_level: "info".to_string(),
        redis_url: None,
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        financial_model_url: None,
        general_model_url: None,
        ner_url: None,
        model_timeout_ms: 5000,
        model_max_retries: 1,
        rate_limit_sentiment_per_min: 30,
        rate_limit_recommend_per_min: 20,
    };

    let pool_config = PoolConfig::from_app_config(&app_config);
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

/// Compile-time smoke test: confirm that [`LearningProgressRow`] has all
/// expected fields with the correct types. No database required.
#[test]
fn learning_progress_row_has_expected_fields() {
    let row = LearningProgressRow {
        category: "stocks".to_string(),
        completed_courses: 3,
        avg_score: Some(Decimal::new(8250, 2)),
        first_completed_at: None,
    };

    assert_eq!(row.category, "stocks");
    assert_eq!(row.completed_courses, 3);
    assert_eq!(row.avg_score, Some(Decimal::new(8250, 2)));
}

#[test]
fn course_candidate_row_has_expected_fields() {
    let row = CourseCandidateRow {
        id: uuid::Uuid::nil(),
        title: "Options 101".to_string(),
        description: None,
        category: "derivatives".to_string(),
        level: "beginner".to_string(),
        language: Some("en".to_string()),
        created_at: chrono::Utc::now(),
        avg_rating: None,
        review_count: 0,
    };

    assert_eq!(row.level, "beginner");
    assert!(row.avg_rating.is_none());
    assert_eq!(row.review_count, 0);
}
