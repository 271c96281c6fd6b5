use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{ItemId, ItemSummary, Mode, RecommendationRequest, RecommendationsResponse},
    services::recommendations,
};

use super::AppState;

const ANONYMOUS_USER: &str = "anonymous";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub items: usize,
    pub dimension: usize,
    pub loaded_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub items: usize,
    pub dimension: usize,
    pub loaded_at: DateTime<Utc>,
}

/// Health check with a summary of the published catalog
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let catalog = state.snapshot().await;
    Json(HealthResponse {
        status: "ok",
        items: catalog.len(),
        dimension: catalog.dimension(),
        loaded_at: catalog.loaded_at(),
    })
}

/// Ranks the catalog for the signal carried in the request body
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<RecommendationsResponse>> {
    let mode = Mode::parse(request.mode.as_deref(), &request.mode_params())?;
    let k = state.resolve_k(request.k)?;
    if let (Some(min), Some(max)) = (request.runtime_min, request.runtime_max) {
        if min > max {
            return Err(AppError::InvalidInput(format!(
                "runtime_min ({}) is greater than runtime_max ({})",
                min, max
            )));
        }
    }

    let user_id = request
        .user_id
        .clone()
        .unwrap_or_else(|| ANONYMOUS_USER.to_string());

    tracing::info!(
        request_id = %request_id,
        user_id = %user_id,
        mode = %mode,
        k,
        liked = request.liked_ids.len(),
        preferred_genres = request.preferred_genres.len(),
        "Processing recommendation request"
    );

    let signal = request.signal();
    let catalog = state.snapshot().await;
    let mode_label = mode.to_string();
    let recommendations = tokio::task::spawn_blocking(move || {
        recommendations::recommend(&catalog, &signal, &mode, k)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Ranking task failed: {}", e)))?;

    tracing::info!(
        request_id = %request_id,
        returned = recommendations.len(),
        "Recommendations completed"
    );

    Ok(Json(RecommendationsResponse {
        count: recommendations.len(),
        recommendations,
        user_id,
        mode: mode_label,
    }))
}

/// Genre vocabulary of the published catalog
pub async fn list_genres(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.snapshot().await.genre_vocabulary().to_vec())
}

/// Distinct services across the published catalog, sorted
pub async fn list_services(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.snapshot().await.services())
}

/// Single item by id
pub async fn get_movie(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> AppResult<Json<ItemSummary>> {
    let catalog = state.snapshot().await;
    catalog
        .get(&ItemId(id))
        .map(|item| Json(item.summary()))
        .ok_or_else(|| AppError::NotFound(format!("Movie {} not found", id)))
}

/// Re-reads the catalog source and swaps in the new snapshot
pub async fn reload_catalog(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<Json<ReloadResponse>> {
    tracing::info!(request_id = %request_id, "Catalog reload requested");

    let catalog = state.reload().await?;

    Ok(Json(ReloadResponse {
        items: catalog.len(),
        dimension: catalog.dimension(),
        loaded_at: catalog.loaded_at(),
    }))
}
