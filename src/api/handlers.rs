use std::collections::BTreeMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppResult;
use crate::models::MovieSummary;

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<MovieSummary>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Movies grouped by the fixed category set
pub async fn get_categories(
    State(state): State<AppState>,
) -> Json<BTreeMap<&'static str, Vec<MovieSummary>>> {
    Json(state.catalog.categories().await)
}

/// Title search proxied to the metadata source
pub async fn search_movies(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Value>> {
    let body = state.catalog.search(&params.q).await?;
    Ok(Json(body))
}

/// Details for a single movie
pub async fn get_movie_details(
    State(state): State<AppState>,
    Path(movie_id): Path<u64>,
) -> AppResult<Json<Value>> {
    let body = state.catalog.movie_details(movie_id).await?;
    Ok(Json(body))
}

/// Recommendations for a single movie, upstream-preferred with the local
/// index as fallback
pub async fn get_recommendations(
    State(state): State<AppState>,
    Path(movie_id): Path<u64>,
) -> Json<RecommendationsResponse> {
    let recommendations = state
        .catalog
        .recommendations(movie_id, &state.recommender)
        .await;
    Json(RecommendationsResponse { recommendations })
}
