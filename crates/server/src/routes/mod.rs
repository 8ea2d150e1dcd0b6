//! API routes for the document QA service.

pub mod query;
pub mod upload;

use crate::state::AppState;
use axum::{
    extract::{DefaultBodyLimit, State},
    routing::{get, post},
    Json, Router,
};
use docqa_knowledge::StoreStats;

/// Routes mounted under `/api`.
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/upload",
            post(upload::upload_file).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route("/query", post(query::query_documents))
        .route("/stats", get(store_stats))
}

/// GET /api/stats
async fn store_stats(State(state): State<AppState>) -> Json<StoreStats> {
    Json(state.store().stats().await)
}
