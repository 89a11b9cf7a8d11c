mod chat_service;
mod embedding_client;
mod generation_client;
mod ingestion_service;
mod prompt_builder;
mod rag_orchestrator;
mod retrieval_client;

pub use chat_service::{ChatError, ChatService};
pub use embedding_client::{EmbeddingClient, EmbeddingFailure};
pub use generation_client::{GenerationClient, GenerationFailure};
pub use ingestion_service::{IngestReport, IngestionError, IngestionService};
pub use prompt_builder::PromptBuilder;
pub use rag_orchestrator::{RagOrchestrator, Readiness, TOP_K};
pub use retrieval_client::RetrievalClient;
