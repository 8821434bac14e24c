//! Axum server and routes.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use journal_types::{Journal, MemoryResponse, SubmitOutcome, SubmitRequest};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub struct AppState {
    pub journal: Arc<dyn Journal>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/journal/submit", post(handle_submit))
        .route("/journal/memory", get(handle_memory))
        .route("/health", get(handle_health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Per-submission failures never become HTTP errors: they ride back in the
/// outcome's notice so the caller can show them and let the user retry.
async fn handle_submit(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SubmitRequest>,
) -> Json<SubmitOutcome> {
    Json(state.journal.submit_entry(&req.entry, req.history).await)
}

async fn handle_memory(State(state): State<Arc<AppState>>) -> Json<MemoryResponse> {
    Json(MemoryResponse {
        memory: state.journal.memory_summary().await,
    })
}

async fn handle_health() -> &'static str {
    "ok"
}
