use async_trait::async_trait;
use tokio::sync::RwLock;

use super::ConversationSnapshot;
use crate::application::ports::{ConversationRepository, RepositoryError};
use crate::domain::{Conversation, ConversationId, ConversationSummary, Message, Sender};

/// Non-durable history for tests and for running without a configured history file.
#[derive(Default)]
pub struct InMemoryConversationRepository {
    snapshot: RwLock<ConversationSnapshot>,
}

impl InMemoryConversationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversationRepository for InMemoryConversationRepository {
    async fn list_summaries(&self) -> Result<Vec<ConversationSummary>, RepositoryError> {
        Ok(self.snapshot.read().await.summaries())
    }

    async fn get_conversation(&self, id: ConversationId) -> Result<Conversation, RepositoryError> {
        self.snapshot
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or(RepositoryError::NotFound(id))
    }

    async fn create_conversation(&self) -> Result<Conversation, RepositoryError> {
        let conversation = Conversation::new();
        self.snapshot.write().await.insert(conversation.clone());
        Ok(conversation)
    }

    async fn append_message(
        &self,
        id: ConversationId,
        sender: Sender,
        text: &str,
    ) -> Result<Message, RepositoryError> {
        self.snapshot.write().await.append(id, sender, text)
    }

    async fn delete_conversation(&self, id: ConversationId) -> Result<bool, RepositoryError> {
        Ok(self.snapshot.write().await.remove(id))
    }
}
