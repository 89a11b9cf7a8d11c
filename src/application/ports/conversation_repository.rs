use async_trait::async_trait;

use crate::domain::{Conversation, ConversationId, ConversationSummary, Message, Sender};

use super::RepositoryError;

/// Durable keyed collection of conversations. The single source of truth for chat history.
///
/// Every mutation is durable before it returns `Ok`; a `PersistenceFailed` error means the
/// mutation did not happen as far as any later reader is concerned.
#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// One summary per conversation, in insertion order.
    async fn list_summaries(&self) -> Result<Vec<ConversationSummary>, RepositoryError>;

    async fn get_conversation(&self, id: ConversationId) -> Result<Conversation, RepositoryError>;

    async fn create_conversation(&self) -> Result<Conversation, RepositoryError>;

    async fn append_message(
        &self,
        id: ConversationId,
        sender: Sender,
        text: &str,
    ) -> Result<Message, RepositoryError>;

    /// Returns whether the conversation existed.
    async fn delete_conversation(&self, id: ConversationId) -> Result<bool, RepositoryError>;
}
