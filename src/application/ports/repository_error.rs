use crate::domain::ConversationId;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("conversation not found: {0}")]
    NotFound(ConversationId),
    #[error("persistence failed: {0}")]
    PersistenceFailed(String),
    #[error("stored history is corrupted: {0}")]
    Corrupted(String),
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
