mod recommendations;
mod sentiment;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use finai_recommend::{RecommendError, RecommendationService};
use finai_sentiment::{SentimentEngine, SentimentError};
use serde::Serialize;
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::middleware::{
    enforce_rate_limit, request_id, require_bearer_auth, AuthState, RateLimitState, RequestId,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub sentiment: Arc<SentimentEngine>,
    pub recommendations: Arc<RecommendationService>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "unauthorized" => StatusCode::UNAUTHORIZED,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "conflict" => StatusCode::CONFLICT,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_db_error(request_id: String, error: &finai_db::DbError) -> ApiError {
    tracing::error!(error = %error, "database query failed");
    ApiError::new(request_id, "internal_error", "database query failed")
}

pub(super) fn map_sentiment_error(request_id: String, error: &SentimentError) -> ApiError {
    match error {
        SentimentError::InvalidInput(message) => {
            ApiError::new(request_id, "validation_error", message.clone())
        }
        other => {
            tracing::error!(error = %other, "sentiment analysis failed");
            ApiError::new(request_id, "internal_error", "sentiment analysis failed")
        }
    }
}

pub(super) fn map_recommend_error(request_id: String, error: &RecommendError) -> ApiError {
    match error {
        RecommendError::InvalidInput(message) => {
            ApiError::new(request_id, "validation_error", message.clone())
        }
        RecommendError::Db(db) => map_db_error(request_id, db),
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
}

/// One limiter per protected route group.
#[derive(Debug, Clone)]
pub struct RateLimits {
    pub sentiment: RateLimitState,
    pub recommend: RateLimitState,
}

impl RateLimits {
    #[must_use]
    pub fn per_minute(sentiment: usize, recommend: usize) -> Self {
        Self {
            sentiment: RateLimitState::per_minute(sentiment),
            recommend: RateLimitState::per_minute(recommend),
        }
    }
}

fn protect(routes: Router<AppState>, auth: AuthState, rate_limit: RateLimitState) -> Router<AppState> {
    routes.layer(
        ServiceBuilder::new()
            .layer(axum::middleware::from_fn_with_state(
                auth,
                require_bearer_auth,
            ))
            .layer(axum::middleware::from_fn_with_state(
                rate_limit,
                enforce_rate_limit,
            )),
    )
}

fn sentiment_router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/sentiment", post(sentiment::analyze))
        .route("/api/v1/sentiment/batch", post(sentiment::analyze_batch))
        .route("/api/v1/sentiment/market", get(sentiment::market_summary))
}

fn recommendations_router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/recommendations",
            post(recommendations::get_recommendations),
        )
        .route(
            "/api/v1/recommendations/feedback",
            post(recommendations::record_feedback),
        )
}

pub fn build_app(state: AppState, auth: AuthState, limits: RateLimits) -> Router {
    let public_routes = Router::new().route("/api/v1/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(protect(sentiment_router(), auth.clone(), limits.sentiment))
        .merge(protect(recommendations_router(), auth, limits.recommend))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    match finai_db::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    database: "ok",
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        database: "unavailable",
                    },
                    meta,
                }),
            )
        }
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
