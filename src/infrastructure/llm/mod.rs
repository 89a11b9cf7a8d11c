mod chat_completions_client;
mod embedder;

pub use chat_completions_client::{ChatCompletionsClient, create_chat_completions_client};
pub use embedder::{EmbedderFactory, LocalCandleEmbedder, OpenAiEmbedder};
