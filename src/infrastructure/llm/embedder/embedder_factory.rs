use std::sync::Arc;

use crate::application::ports::{Embedder, EmbedderError};
use crate::infrastructure::llm::{LocalCandleEmbedder, OpenAiEmbedder};
use crate::presentation::config::{EmbeddingProvider, EmbeddingsSettings};

pub struct EmbedderFactory;

impl EmbedderFactory {
    /// Builds the configured embedder once at startup. Local models are loaded on the
    /// blocking pool since loading may download weights.
    pub async fn create(settings: &EmbeddingsSettings) -> Result<Arc<dyn Embedder>, EmbedderError> {
        match settings.provider {
            EmbeddingProvider::Local => {
                let model = settings.model.clone();
                let embedder = tokio::task::spawn_blocking(move || LocalCandleEmbedder::load(&model))
                    .await
                    .map_err(|e| EmbedderError::ModelLoadFailed(e.to_string()))??;
                Ok(Arc::new(embedder))
            }
            EmbeddingProvider::OpenAi => {
                let key = settings
                    .api_key
                    .clone()
                    .filter(|k| !k.trim().is_empty())
                    .ok_or(EmbedderError::MissingApiKey)?;
                tracing::info!(model = %settings.model, "Using OpenAI embedding model");
                Ok(Arc::new(OpenAiEmbedder::new(key, settings.model.clone())))
            }
        }
    }
}
