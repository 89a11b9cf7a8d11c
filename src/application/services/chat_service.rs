use std::sync::Arc;

use tracing::{error, instrument};

use super::RagOrchestrator;
use crate::application::ports::{ConversationRepository, RepositoryError};
use crate::domain::{AnswerResult, ConversationId, Message, Sender};

/// Conversation-aware entry point: records the user's turn, answers it, records the reply.
pub struct ChatService {
    orchestrator: Arc<RagOrchestrator>,
    conversations: Arc<dyn ConversationRepository>,
}

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("conversation not found: {0}")]
    NotFound(ConversationId),
    #[error("message must not be empty")]
    EmptyMessage,
    #[error("history persistence failed: {0}")]
    Persistence(RepositoryError),
}

impl From<RepositoryError> for ChatError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound(id) => ChatError::NotFound(id),
            RepositoryError::InvalidMessage(_) => ChatError::EmptyMessage,
            other => ChatError::Persistence(other),
        }
    }
}

impl ChatService {
    pub fn new(
        orchestrator: Arc<RagOrchestrator>,
        conversations: Arc<dyn ConversationRepository>,
    ) -> Self {
        Self {
            orchestrator,
            conversations,
        }
    }

    pub fn orchestrator(&self) -> &RagOrchestrator {
        &self.orchestrator
    }

    /// Answers a one-off question without touching conversation history.
    #[instrument(skip_all)]
    pub async fn ask(&self, question: &str) -> Result<AnswerResult, ChatError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        Ok(self.orchestrator.answer(question).await)
    }

    /// Appends the user's message, runs the pipeline, and appends the reply, fallback text
    /// included. An unknown conversation fails before any provider is called.
    #[instrument(skip(self, text), fields(conversation_id = %id))]
    pub async fn send_message(&self, id: ConversationId, text: &str) -> Result<Message, ChatError> {
        let question = text.trim();
        if question.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        self.conversations
            .append_message(id, Sender::User, text)
            .await?;

        let answer = self.orchestrator.answer(question).await;

        self.conversations
            .append_message(id, Sender::Bot, answer.text())
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to save bot reply");
                ChatError::from(e)
            })
    }
}
