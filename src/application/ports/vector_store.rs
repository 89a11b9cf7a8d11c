use async_trait::async_trait;

use super::{CollectionConfig, VectorStoreError};
use crate::domain::{Chunk, Embedding, RetrievedPassage};

#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Creates the collection if missing. Returns `true` when it was created by this call.
    async fn ensure_collection(&self, config: &CollectionConfig) -> Result<bool, VectorStoreError>;

    async fn collection_exists(&self) -> Result<bool, VectorStoreError>;

    async fn upsert(
        &self,
        chunks: &[Chunk],
        embeddings: &[Embedding],
    ) -> Result<(), VectorStoreError>;

    /// Nearest neighbours of `embedding`, most relevant first.
    async fn search(
        &self,
        embedding: &Embedding,
        top_k: usize,
    ) -> Result<Vec<RetrievedPassage>, VectorStoreError>;
}
