use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use tracing::{error, info, instrument};

use super::ConversationSnapshot;
use crate::application::ports::{ConversationRepository, RepositoryError};
use crate::domain::{Conversation, ConversationId, ConversationSummary, Message, Sender};

/// Conversation history mirrored to a single JSON file.
///
/// Writers are serialized by `writer` and rewrite the whole file before publishing the new
/// snapshot, so concurrent appends never lose each other's updates and readers only ever
/// see state that reached disk.
pub struct JsonFileConversationRepository {
    path: PathBuf,
    current: RwLock<Arc<ConversationSnapshot>>,
    writer: Mutex<()>,
}

impl JsonFileConversationRepository {
    /// Opens the history file, creating it (and its directory) when missing.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| RepositoryError::PersistenceFailed(e.to_string()))?;
        }

        let snapshot = match tokio::fs::read(&path).await {
            Ok(bytes) => ConversationSnapshot::from_json(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => ConversationSnapshot::default(),
            Err(e) => return Err(RepositoryError::PersistenceFailed(e.to_string())),
        };

        let repository = Self {
            path,
            current: RwLock::new(Arc::new(ConversationSnapshot::default())),
            writer: Mutex::new(()),
        };
        repository.commit(snapshot).await?;

        info!(
            conversations = repository.snapshot().await.len(),
            "Conversation history loaded"
        );
        Ok(repository)
    }

    async fn snapshot(&self) -> Arc<ConversationSnapshot> {
        Arc::clone(&*self.current.read().await)
    }

    /// Writes `next` to disk and publishes it. On failure the published snapshot is untouched.
    async fn commit(&self, next: ConversationSnapshot) -> Result<(), RepositoryError> {
        let bytes = next.to_json()?;
        if let Err(e) = write_atomically(&self.path, &bytes).await {
            error!(error = %e, path = %self.path.display(), "Failed to save conversation history");
            return Err(RepositoryError::PersistenceFailed(e.to_string()));
        }

        *self.current.write().await = Arc::new(next);
        Ok(())
    }
}

async fn write_atomically(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut temp = path.as_os_str().to_owned();
    temp.push(".tmp");
    let temp = PathBuf::from(temp);

    tokio::fs::write(&temp, bytes).await?;
    tokio::fs::rename(&temp, path).await
}

#[async_trait]
impl ConversationRepository for JsonFileConversationRepository {
    async fn list_summaries(&self) -> Result<Vec<ConversationSummary>, RepositoryError> {
        Ok(self.snapshot().await.summaries())
    }

    async fn get_conversation(&self, id: ConversationId) -> Result<Conversation, RepositoryError> {
        self.snapshot()
            .await
            .get(id)
            .cloned()
            .ok_or(RepositoryError::NotFound(id))
    }

    #[instrument(skip(self))]
    async fn create_conversation(&self) -> Result<Conversation, RepositoryError> {
        let _writer = self.writer.lock().await;

        let conversation = Conversation::new();
        let mut next = (*self.snapshot().await).clone();
        next.insert(conversation.clone());
        self.commit(next).await?;

        info!(conversation_id = %conversation.id, "Created conversation");
        Ok(conversation)
    }

    #[instrument(skip(self, text), fields(conversation_id = %id, sender = %sender))]
    async fn append_message(
        &self,
        id: ConversationId,
        sender: Sender,
        text: &str,
    ) -> Result<Message, RepositoryError> {
        let _writer = self.writer.lock().await;

        let current = self.snapshot().await;
        if !current.contains(id) {
            return Err(RepositoryError::NotFound(id));
        }

        let mut next = (*current).clone();
        let message = next.append(id, sender, text)?;
        self.commit(next).await?;

        Ok(message)
    }

    #[instrument(skip(self), fields(conversation_id = %id))]
    async fn delete_conversation(&self, id: ConversationId) -> Result<bool, RepositoryError> {
        let _writer = self.writer.lock().await;

        let current = self.snapshot().await;
        if !current.contains(id) {
            return Ok(false);
        }

        let mut next = (*current).clone();
        next.remove(id);
        self.commit(next).await?;

        info!("Deleted conversation");
        Ok(true)
    }
}
