use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{Duration, Utc};
use finai_sentiment::{
    summarize_market_sentiment, MarketSentimentSummary, ModelSelector, SentimentVerdict,
};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_db_error, map_sentiment_error, ApiError, ApiResponse, AppState, ResponseMeta};

pub(super) const MAX_BATCH_TEXTS: usize = 100;
const DEFAULT_MARKET_HOURS: i64 = 24;
const MAX_MARKET_HOURS: i64 = 168;

#[derive(Debug, Deserialize)]
pub(super) struct AnalyzeRequest {
    pub text: String,
    #[serde(default)]
    pub include_entities: bool,
    pub model_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct BatchRequest {
    pub texts: Vec<String>,
    pub model_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct BatchResponse {
    pub results: Vec<SentimentVerdict>,
    pub total_processed: usize,
}

#[derive(Debug, Deserialize)]
pub(super) struct MarketQuery {
    pub hours: Option<i64>,
}

fn parse_selector(request_id: &str, raw: Option<&str>) -> Result<ModelSelector, ApiError> {
    match raw {
        None => Ok(ModelSelector::default()),
        Some(value) => value
            .parse::<ModelSelector>()
            .map_err(|e| ApiError::new(request_id, "validation_error", e.to_string())),
    }
}

pub(super) fn normalize_hours(hours: Option<i64>) -> i64 {
    hours
        .unwrap_or(DEFAULT_MARKET_HOURS)
        .clamp(1, MAX_MARKET_HOURS)
}

pub(super) async fn analyze(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<AnalyzeRequest>,
) -> Result<Json<ApiResponse<SentimentVerdict>>, ApiError> {
    let selector = parse_selector(&req_id.0, body.model_type.as_deref())?;

    let verdict = state
        .sentiment
        .analyze(&body.text, body.include_entities, selector)
        .await
        .map_err(|e| map_sentiment_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: verdict,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn analyze_batch(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<BatchRequest>,
) -> Result<Json<ApiResponse<BatchResponse>>, ApiError> {
    if body.texts.is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "texts must not be empty",
        ));
    }
    if body.texts.len() > MAX_BATCH_TEXTS {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            format!("at most {MAX_BATCH_TEXTS} texts per batch"),
        ));
    }
    let selector = parse_selector(&req_id.0, body.model_type.as_deref())?;

    let results = state.sentiment.analyze_batch(&body.texts, selector).await;

    Ok(Json(ApiResponse {
        data: BatchResponse {
            total_processed: results.len(),
            results,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn market_summary(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<MarketQuery>,
) -> Result<Json<ApiResponse<MarketSentimentSummary>>, ApiError> {
    let since = Utc::now() - Duration::hours(normalize_hours(query.hours));
    let labels = finai_db::list_market_news_sentiment(&state.pool, since)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: summarize_market_sentiment(labels.iter().map(String::as_str)),
        meta: ResponseMeta::new(req_id.0),
    }))
}
