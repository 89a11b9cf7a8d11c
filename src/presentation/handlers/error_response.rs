use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::ports::RepositoryError;
use crate::application::services::ChatError;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

pub fn not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "Conversation not found")
}

/// Storage detail stays in the logs; clients get a generic body.
pub fn internal_error() -> Response {
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Failed to save chat history",
    )
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        match self {
            ChatError::NotFound(_) => not_found(),
            ChatError::EmptyMessage => {
                error_response(StatusCode::BAD_REQUEST, "Message must not be empty")
            }
            ChatError::Persistence(e) => {
                tracing::error!(error = %e, "Chat history persistence failed");
                internal_error()
            }
        }
    }
}

impl IntoResponse for RepositoryError {
    fn into_response(self) -> Response {
        match self {
            RepositoryError::NotFound(_) => not_found(),
            RepositoryError::InvalidMessage(msg) => error_response(StatusCode::BAD_REQUEST, msg),
            other => {
                tracing::error!(error = %other, "Conversation store failure");
                internal_error()
            }
        }
    }
}
