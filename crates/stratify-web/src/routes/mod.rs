//! HTTP routes.

pub mod api;

use crate::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::CorsLayer;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/predict", post(api::predict))
        .route("/api/records", get(api::list_records).post(api::add_record))
        .route("/api/records/:id", delete(api::delete_record))
        .route(
            "/api/categories",
            get(api::list_categories).post(api::upsert_category),
        )
        .route("/api/alignment", get(api::alignment))
        .route("/api/stats", get(api::stats))
        // CORS for development
        .layer(CorsLayer::permissive())
        .with_state(state)
}
