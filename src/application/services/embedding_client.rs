use std::sync::Arc;
use std::time::Duration;

use tracing::{instrument, warn};

use crate::application::ports::Embedder;
use crate::domain::Embedding;

/// Question embedding with an explicit readiness flag and a bounded call time.
///
/// A client built with [`EmbeddingClient::unavailable`] stays unavailable for the life of
/// the process; every call fails fast without touching the provider.
#[derive(Clone)]
pub struct EmbeddingClient {
    embedder: Option<Arc<dyn Embedder>>,
    timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EmbeddingFailure {
    #[error("embedding provider unavailable")]
    Unavailable,
    #[error("embedding failed: {0}")]
    Failed(String),
    #[error("embedding timed out after {0:?}")]
    TimedOut(Duration),
}

impl EmbeddingClient {
    pub fn new(embedder: Arc<dyn Embedder>, timeout: Duration) -> Self {
        Self {
            embedder: Some(embedder),
            timeout,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            embedder: None,
            timeout: Duration::ZERO,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.embedder.is_some()
    }

    #[instrument(skip_all, fields(chars = text.chars().count()))]
    pub async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingFailure> {
        let Some(embedder) = &self.embedder else {
            warn!("Embedding requested but no embedding model is loaded");
            return Err(EmbeddingFailure::Unavailable);
        };

        if text.trim().is_empty() {
            return Err(EmbeddingFailure::Failed("empty input".to_string()));
        }

        match tokio::time::timeout(self.timeout, embedder.embed(text)).await {
            Ok(Ok(embedding)) if !embedding.is_empty() => Ok(embedding),
            Ok(Ok(_)) => {
                warn!("Embedding provider returned an empty vector");
                Err(EmbeddingFailure::Failed("empty vector".to_string()))
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Embedding call failed");
                Err(EmbeddingFailure::Failed(e.to_string()))
            }
            Err(_) => {
                warn!(timeout_ms = self.timeout.as_millis() as u64, "Embedding call timed out");
                Err(EmbeddingFailure::TimedOut(self.timeout))
            }
        }
    }
}
