mod conversation_snapshot;
mod in_memory_conversation_repository;
mod json_file_conversation_repository;
mod qdrant_adapter;

pub use conversation_snapshot::ConversationSnapshot;
pub use in_memory_conversation_repository::InMemoryConversationRepository;
pub use json_file_conversation_repository::JsonFileConversationRepository;
pub use qdrant_adapter::QdrantAdapter;
