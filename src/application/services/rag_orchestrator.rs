use tracing::{info, instrument, warn};

use super::{
    EmbeddingClient, EmbeddingFailure, GenerationClient, GenerationFailure, PromptBuilder,
    RetrievalClient,
};
use crate::domain::{AnswerResult, FallbackReason};

/// Number of passages retrieved per question. Bounds prompt size.
pub const TOP_K: usize = 5;

/// Embed, retrieve, build prompt, generate. Strictly sequential; stops at the first
/// stage that cannot produce its output and reports a [`FallbackReason`].
///
/// Holds no per-request state, so one instance serves all requests concurrently.
pub struct RagOrchestrator {
    embedding: EmbeddingClient,
    retrieval: RetrievalClient,
    generation: GenerationClient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Readiness {
    pub embedding: bool,
    pub retrieval: bool,
    pub generation: bool,
}

impl RagOrchestrator {
    pub fn new(
        embedding: EmbeddingClient,
        retrieval: RetrievalClient,
        generation: GenerationClient,
    ) -> Self {
        Self {
            embedding,
            retrieval,
            generation,
        }
    }

    pub fn readiness(&self) -> Readiness {
        Readiness {
            embedding: self.embedding.is_ready(),
            retrieval: self.retrieval.is_ready(),
            generation: self.generation.is_ready(),
        }
    }

    #[instrument(skip_all)]
    pub async fn answer(&self, question: &str) -> AnswerResult {
        if !self.retrieval.is_ready() {
            return fallback(FallbackReason::ServiceUnavailable);
        }

        let embedding = match self.embedding.embed(question).await {
            Ok(embedding) => embedding,
            Err(EmbeddingFailure::Unavailable) => {
                return fallback(FallbackReason::EmbeddingUnavailable);
            }
            Err(_) => return fallback(FallbackReason::EmbeddingFailed),
        };

        let passages = self.retrieval.query(&embedding, TOP_K).await;
        if passages.is_empty() {
            return fallback(FallbackReason::NoRelevantContext);
        }

        let texts: Vec<&str> = passages.iter().map(|p| p.text.as_str()).collect();
        let prompt = PromptBuilder::build(question, &texts);

        match self.generation.generate(&prompt).await {
            Ok(text) => {
                info!(passages = passages.len(), "Answer generated");
                AnswerResult::Answered(text)
            }
            Err(GenerationFailure::Unavailable) => {
                fallback(FallbackReason::GenerationUnavailable)
            }
            Err(_) => fallback(FallbackReason::GenerationFailed),
        }
    }
}

fn fallback(reason: FallbackReason) -> AnswerResult {
    warn!(reason = reason.as_str(), "Answering with fallback reply");
    AnswerResult::Fallback(reason)
}
