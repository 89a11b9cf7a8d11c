mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    EmbeddingProvider, EmbeddingsSettings, LlmProvider, LlmSettings, LoggingSettings,
    QdrantSettings, ServerSettings, Settings, StorageSettings,
};
