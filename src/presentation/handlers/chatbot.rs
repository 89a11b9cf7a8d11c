use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

use crate::infrastructure::observability::sanitize_prompt;
use crate::presentation::state::AppState;

#[derive(Deserialize)]
pub struct MessageRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Serialize)]
pub struct ChatbotResponse {
    pub reply: String,
}

/// One-off question outside any conversation. Nothing is persisted.
#[tracing::instrument(skip(state, request))]
pub async fn chatbot_handler(
    State(state): State<AppState>,
    Json(request): Json<MessageRequest>,
) -> impl IntoResponse {
    tracing::debug!(question = %sanitize_prompt(&request.message), "Processing chatbot question");

    match state.chat_service.ask(&request.message).await {
        Ok(answer) => {
            tracing::info!(answered = answer.is_answered(), "Chatbot reply ready");
            (
                StatusCode::OK,
                Json(ChatbotResponse {
                    reply: answer.into_text(),
                }),
            )
                .into_response()
        }
        Err(e) => e.into_response(),
    }
}
