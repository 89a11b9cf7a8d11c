use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use crate::application::ports::VectorStore;
use crate::domain::{Embedding, RetrievedPassage};

/// Nearest-neighbour lookup over the knowledge base.
///
/// Provider errors and timeouts collapse to an empty result; only [`RetrievalClient::is_ready`]
/// tells "searched and found nothing" apart from "could not search".
#[derive(Clone)]
pub struct RetrievalClient {
    store: Option<Arc<dyn VectorStore>>,
    timeout: Duration,
}

impl RetrievalClient {
    pub fn new(store: Arc<dyn VectorStore>, timeout: Duration) -> Self {
        Self {
            store: Some(store),
            timeout,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            store: None,
            timeout: Duration::ZERO,
        }
    }

    /// Checks once that the index exists. A missing or unreachable index yields an
    /// unavailable client; readiness is never re-checked afterwards.
    pub async fn probe(store: Arc<dyn VectorStore>, timeout: Duration) -> Self {
        match tokio::time::timeout(timeout, store.collection_exists()).await {
            Ok(Ok(true)) => {
                info!("Vector index is ready");
                Self::new(store, timeout)
            }
            Ok(Ok(false)) => {
                warn!("Vector index collection does not exist; retrieval disabled");
                Self::unavailable()
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Vector index unreachable; retrieval disabled");
                Self::unavailable()
            }
            Err(_) => {
                warn!("Vector index readiness check timed out; retrieval disabled");
                Self::unavailable()
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        self.store.is_some()
    }

    #[instrument(skip(self, embedding), fields(top_k = top_k))]
    pub async fn query(&self, embedding: &Embedding, top_k: usize) -> Vec<RetrievedPassage> {
        let Some(store) = &self.store else {
            warn!("Retrieval requested but the vector index is unavailable");
            return Vec::new();
        };

        if top_k == 0 {
            return Vec::new();
        }

        match tokio::time::timeout(self.timeout, store.search(embedding, top_k)).await {
            Ok(Ok(passages)) => {
                let passages: Vec<RetrievedPassage> = passages
                    .into_iter()
                    .filter(|p| !p.text.trim().is_empty())
                    .take(top_k)
                    .collect();
                debug!(found = passages.len(), "Retrieved passages");
                passages
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Vector search failed");
                Vec::new()
            }
            Err(_) => {
                warn!(timeout_ms = self.timeout.as_millis() as u64, "Vector search timed out");
                Vec::new()
            }
        }
    }
}
