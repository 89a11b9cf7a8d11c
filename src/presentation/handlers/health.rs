use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub embedding_ready: bool,
    pub retrieval_ready: bool,
    pub generation_ready: bool,
}

/// Liveness plus per-provider readiness. Always 200: a degraded provider still answers
/// with fallback text.
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let readiness = state.chat_service.orchestrator().readiness();

    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            embedding_ready: readiness.embedding,
            retrieval_ready: readiness.retrieval,
            generation_ready: readiness.generation,
        }),
    )
}
