use axum::{extract::State, Extension, Json};
use finai_recommend::{FeedbackEvent, FeedbackType, Preferences, RankedRecommendationSet};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_recommend_error, ApiError, ApiResponse, AppState, ResponseMeta};

const DEFAULT_LIMIT: usize = 10;
const MAX_LIMIT: usize = 50;

#[derive(Debug, Deserialize)]
pub(super) struct RecommendationsRequest {
    pub user_id: i64,
    #[serde(default)]
    pub preferences: Preferences,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub(super) struct FeedbackRequest {
    pub user_id: i64,
    pub item_id: String,
    pub feedback_type: String,
    pub rating: Option<f64>,
}

pub(super) fn normalize_limit(limit: Option<usize>) -> usize {
    limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

pub(super) async fn get_recommendations(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<RecommendationsRequest>,
) -> Result<Json<ApiResponse<RankedRecommendationSet>>, ApiError> {
    let set = state
        .recommendations
        .get_recommendations(body.user_id, &body.preferences, normalize_limit(body.limit))
        .await
        .map_err(|e| map_recommend_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: set,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn record_feedback(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<FeedbackRequest>,
) -> Result<Json<ApiResponse<FeedbackEvent>>, ApiError> {
    let feedback_type = body
        .feedback_type
        .parse::<FeedbackType>()
        .map_err(|e| ApiError::new(req_id.0.clone(), "validation_error", e.to_string()))?;

    let event = state
        .recommendations
        .record_feedback(body.user_id, &body.item_id, feedback_type, body.rating)
        .await
        .map_err(|e| map_recommend_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: event,
        meta: ResponseMeta::new(req_id.0),
    }))
}
