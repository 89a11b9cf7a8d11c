mod plain_text_adapter;
mod sentence_splitter;

pub use plain_text_adapter::PlainTextAdapter;
pub use sentence_splitter::{DEFAULT_MAX_CHUNK_CHARS, SentenceSplitter};
