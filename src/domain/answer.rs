/// Outcome of one pass through the retrieval-augmented pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerResult {
    Answered(String),
    Fallback(FallbackReason),
}

impl AnswerResult {
    /// Text shown to the user: the generated answer or the fixed fallback reply.
    pub fn text(&self) -> &str {
        match self {
            AnswerResult::Answered(text) => text,
            AnswerResult::Fallback(reason) => reason.user_message(),
        }
    }

    pub fn into_text(self) -> String {
        match self {
            AnswerResult::Answered(text) => text,
            AnswerResult::Fallback(reason) => reason.user_message().to_string(),
        }
    }

    pub fn is_answered(&self) -> bool {
        matches!(self, AnswerResult::Answered(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FallbackReason {
    /// The vector index was never reachable or does not exist.
    ServiceUnavailable,
    EmbeddingUnavailable,
    EmbeddingFailed,
    NoRelevantContext,
    GenerationUnavailable,
    GenerationFailed,
}

impl FallbackReason {
    pub fn user_message(&self) -> &'static str {
        match self {
            FallbackReason::ServiceUnavailable => "Sorry, the RAG service is not available.",
            FallbackReason::EmbeddingUnavailable => {
                "Sorry, the embedding model is currently unavailable. Please try again later."
            }
            FallbackReason::EmbeddingFailed => "Sorry, embedding failed. Please try again.",
            FallbackReason::NoRelevantContext => {
                "Sorry, I couldn't find specific information about that in my knowledge base."
            }
            FallbackReason::GenerationUnavailable => {
                "Sorry, the AI model is currently unavailable. Please try again later."
            }
            FallbackReason::GenerationFailed => {
                "Sorry, I couldn't generate an answer based on the available information."
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FallbackReason::ServiceUnavailable => "service_unavailable",
            FallbackReason::EmbeddingUnavailable => "embedding_unavailable",
            FallbackReason::EmbeddingFailed => "embedding_failed",
            FallbackReason::NoRelevantContext => "no_relevant_context",
            FallbackReason::GenerationUnavailable => "generation_unavailable",
            FallbackReason::GenerationFailed => "generation_failed",
        }
    }
}
