use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::domain::{Conversation, ConversationId, ConversationSummary, Message};
use crate::infrastructure::observability::sanitize_prompt;
use crate::presentation::state::AppState;

use super::chatbot::MessageRequest;
use super::error_response::not_found;

#[derive(Serialize)]
pub struct ConversationSummaryResponse {
    pub id: String,
    pub title: String,
    pub first_message: String,
    pub created_at: String,
}

impl From<ConversationSummary> for ConversationSummaryResponse {
    fn from(summary: ConversationSummary) -> Self {
        Self {
            id: summary.id.to_string(),
            title: summary.title,
            first_message: summary.first_message,
            created_at: summary.created_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
pub struct ConversationResponse {
    pub id: String,
    pub title: String,
    pub created_at: String,
    pub messages: Vec<MessageResponse>,
}

impl From<Conversation> for ConversationResponse {
    fn from(conversation: Conversation) -> Self {
        Self {
            id: conversation.id.to_string(),
            title: conversation.title,
            created_at: conversation.created_at.to_rfc3339(),
            messages: conversation
                .messages
                .into_iter()
                .map(MessageResponse::from)
                .collect(),
        }
    }
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub sender: String,
    pub text: String,
}

impl From<Message> for MessageResponse {
    fn from(message: Message) -> Self {
        Self {
            sender: message.sender.as_str().to_string(),
            text: message.text,
        }
    }
}

#[derive(Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

/// Ids that do not parse cannot name a stored conversation.
fn parse_id(raw: &str) -> Result<ConversationId, Response> {
    raw.parse::<ConversationId>().map_err(|_| {
        tracing::debug!(conversation_id = %raw, "Malformed conversation id");
        not_found()
    })
}

#[tracing::instrument(skip(state))]
pub async fn list_conversations_handler(State(state): State<AppState>) -> Response {
    match state.conversation_repository.list_summaries().await {
        Ok(summaries) => {
            let body: Vec<ConversationSummaryResponse> = summaries
                .into_iter()
                .map(ConversationSummaryResponse::from)
                .collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

#[tracing::instrument(skip(state))]
pub async fn create_conversation_handler(State(state): State<AppState>) -> Response {
    match state.conversation_repository.create_conversation().await {
        Ok(conversation) => {
            tracing::info!(conversation_id = %conversation.id, "Conversation created");
            (StatusCode::OK, Json(ConversationResponse::from(conversation))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

#[tracing::instrument(skip(state))]
pub async fn get_conversation_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.conversation_repository.get_conversation(id).await {
        Ok(conversation) => {
            (StatusCode::OK, Json(ConversationResponse::from(conversation))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

#[tracing::instrument(skip(state))]
pub async fn delete_conversation_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.conversation_repository.delete_conversation(id).await {
        Ok(true) => {
            tracing::info!(conversation_id = %id, "Conversation deleted");
            (
                StatusCode::OK,
                Json(DeleteResponse {
                    message: format!("Conversation {} deleted successfully.", id),
                }),
            )
                .into_response()
        }
        Ok(false) => not_found(),
        Err(e) => e.into_response(),
    }
}

#[tracing::instrument(skip(state, request))]
pub async fn send_message_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<MessageRequest>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    tracing::debug!(message = %sanitize_prompt(&request.message), "Processing conversation message");

    match state.chat_service.send_message(id, &request.message).await {
        Ok(reply) => (StatusCode::OK, Json(MessageResponse::from(reply))).into_response(),
        Err(e) => e.into_response(),
    }
}
