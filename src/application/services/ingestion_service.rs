use std::sync::Arc;

use tracing::{info, instrument};

use crate::application::ports::{
    CollectionConfig, Embedder, EmbedderError, FileLoader, FileLoaderError, TextSplitter,
    TextSplitterError, VectorStore, VectorStoreError,
};
use crate::domain::{ContentType, Document, DocumentId};

/// Loads a document, splits it into chunks, embeds them, and stores them in the vector index.
pub struct IngestionService {
    file_loader: Arc<dyn FileLoader>,
    embedder: Arc<dyn Embedder>,
    vector_store: Arc<dyn VectorStore>,
    text_splitter: Arc<dyn TextSplitter>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IngestReport {
    pub document_id: DocumentId,
    pub chunks: usize,
}

impl IngestionService {
    pub fn new(
        file_loader: Arc<dyn FileLoader>,
        embedder: Arc<dyn Embedder>,
        vector_store: Arc<dyn VectorStore>,
        text_splitter: Arc<dyn TextSplitter>,
    ) -> Self {
        Self {
            file_loader,
            embedder,
            vector_store,
            text_splitter,
        }
    }

    #[instrument(skip(self, data), fields(size_bytes = data.len()))]
    pub async fn ingest(
        &self,
        data: &[u8],
        filename: String,
        content_type: ContentType,
    ) -> Result<IngestReport, IngestionError> {
        let document = Document::new(filename, content_type, data.len() as u64);
        let document_id = document.id;

        let text = self.file_loader.extract_text(data, &document).await?;
        let chunks = self.text_splitter.split(&text, &document).await?;

        if chunks.is_empty() {
            info!(filename = %document.filename, "Document produced no chunks");
            return Ok(IngestReport {
                document_id,
                chunks: 0,
            });
        }

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;

        if embeddings.len() != chunks.len() {
            return Err(IngestionError::Embedding(EmbedderError::InvalidResponse(
                format!(
                    "expected {} embeddings, got {}",
                    chunks.len(),
                    embeddings.len()
                ),
            )));
        }

        let dimensions = embeddings[0].dimensions() as u64;
        self.vector_store
            .ensure_collection(&CollectionConfig::for_dimensions(dimensions))
            .await?;
        self.vector_store.upsert(&chunks, &embeddings).await?;

        info!(
            filename = %document.filename,
            chunks = chunks.len(),
            "Document ingested"
        );

        Ok(IngestReport {
            document_id,
            chunks: chunks.len(),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IngestionError {
    #[error("file loading: {0}")]
    FileLoading(#[from] FileLoaderError),
    #[error("text splitting: {0}")]
    Splitting(#[from] TextSplitterError),
    #[error("embedding: {0}")]
    Embedding(#[from] EmbedderError),
    #[error("storage: {0}")]
    Storage(#[from] VectorStoreError),
}
