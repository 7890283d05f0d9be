use axum::{middleware, routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Catalog proxy
        .route("/api/movies/categories", get(handlers::get_categories))
        .route("/api/search", get(handlers::search_movies))
        .route("/api/movie/:movie_id", get(handlers::get_movie_details))
        // Recommendations
        .route(
            "/api/recommendations/:movie_id",
            get(handlers::get_recommendations),
        )
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
