mod answer;
mod chunk;
mod conversation;
mod conversation_id;
mod conversation_summary;
mod document;
mod embedding;
mod message;
mod retrieved_passage;
mod sender;

pub use answer::{AnswerResult, FallbackReason};
pub use chunk::{Chunk, ChunkId};
pub use conversation::{Conversation, DEFAULT_TITLE, derive_title};
pub use conversation_id::ConversationId;
pub use conversation_summary::ConversationSummary;
pub use document::{ContentType, Document, DocumentId};
pub use embedding::Embedding;
pub use message::Message;
pub use retrieved_passage::RetrievedPassage;
pub use sender::Sender;
