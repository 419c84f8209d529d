use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{Preferences, Recommendation, SortBy},
    routes::AppState,
    services::recommendations,
};

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    #[serde(flatten)]
    pub preferences: Preferences,
    /// Maximum number of results; falls back to the configured default
    #[serde(default)]
    pub top_k: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub count: usize,
    pub sort_by: SortBy,
    pub results: Vec<Recommendation>,
}

/// Handler for recommendations endpoint
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<RecommendationRequest>, JsonRejection>,
) -> AppResult<Json<RecommendationResponse>> {
    let Json(request) = payload.map_err(|e| AppError::InvalidInput(e.body_text()))?;
    let prefs = request.preferences;
    let top_k = request.top_k.unwrap_or(state.default_top_k);

    tracing::info!(
        request_id = %request_id,
        categories = prefs.categories.len(),
        spicy_tolerance = prefs.spicy_tolerance.label(),
        required_diets = prefs.required_diets().count(),
        avoided = prefs.avoided_ingredients().count(),
        top_k,
        "Processing recommendation request"
    );

    let results = recommendations::recommend(&state.catalog, &prefs, top_k, prefs.sort_by);

    if results.is_empty() {
        tracing::info!(request_id = %request_id, "No dishes matched the filters");
    }

    Ok(Json(RecommendationResponse {
        count: results.len(),
        sort_by: prefs.sort_by,
        results,
    }))
}
