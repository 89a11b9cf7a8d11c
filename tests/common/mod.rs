#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use ragline::application::ports::{
    CollectionConfig, ConversationRepository, Embedder, EmbedderError, LlmClient, LlmClientError,
    RepositoryError, VectorStore, VectorStoreError,
};
use ragline::application::services::{
    ChatService, EmbeddingClient, GenerationClient, RagOrchestrator, RetrievalClient,
};
use ragline::domain::{
    Chunk, Conversation, ConversationId, ConversationSummary, Embedding, Message, RetrievedPassage,
    Sender,
};
use ragline::infrastructure::persistence::InMemoryConversationRepository;

pub const TEST_DIMENSIONS: usize = 384;
pub const CALL_TIMEOUT: Duration = Duration::from_secs(2);
pub const SHORT_TIMEOUT: Duration = Duration::from_millis(50);
pub const SLOW_CALL: Duration = Duration::from_secs(5);

pub struct FakeEmbedder {
    fail: bool,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl FakeEmbedder {
    pub fn working() -> Arc<Self> {
        Arc::new(Self {
            fail: false,
            delay: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            delay: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn slow(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            fail: false,
            delay: Some(delay),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Embedder for FakeEmbedder {
    async fn embed(&self, _text: &str) -> Result<Embedding, EmbedderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(EmbedderError::InferenceFailed("model crashed".to_string()));
        }
        Ok(Embedding::new(vec![0.1; TEST_DIMENSIONS]))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbedderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(EmbedderError::InferenceFailed("model crashed".to_string()));
        }
        Ok(texts
            .iter()
            .map(|_| Embedding::new(vec![0.1; TEST_DIMENSIONS]))
            .collect())
    }
}

pub struct FakeVectorStore {
    passages: Vec<RetrievedPassage>,
    exists: bool,
    fail: bool,
    delay: Option<Duration>,
    searches: AtomicUsize,
    pub ensured: Mutex<Vec<CollectionConfig>>,
    pub upserted: Mutex<Vec<Chunk>>,
}

impl FakeVectorStore {
    fn build(passages: Vec<RetrievedPassage>, exists: bool, fail: bool, delay: Option<Duration>) -> Arc<Self> {
        Arc::new(Self {
            passages,
            exists,
            fail,
            delay,
            searches: AtomicUsize::new(0),
            ensured: Mutex::new(Vec::new()),
            upserted: Mutex::new(Vec::new()),
        })
    }

    pub fn with_passages(texts: &[&str]) -> Arc<Self> {
        let passages = texts
            .iter()
            .enumerate()
            .map(|(i, text)| RetrievedPassage::new(*text, 0.9 - i as f32 * 0.1))
            .collect();
        Self::build(passages, true, false, None)
    }

    pub fn empty() -> Arc<Self> {
        Self::build(Vec::new(), true, false, None)
    }

    pub fn missing_collection() -> Arc<Self> {
        Self::build(Vec::new(), false, false, None)
    }

    pub fn failing() -> Arc<Self> {
        Self::build(Vec::new(), true, true, None)
    }

    pub fn slow(texts: &[&str], delay: Duration) -> Arc<Self> {
        let passages = texts.iter().map(|t| RetrievedPassage::new(*t, 0.9)).collect();
        Self::build(passages, true, false, Some(delay))
    }

    pub fn searches(&self) -> usize {
        self.searches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VectorStore for FakeVectorStore {
    async fn ensure_collection(&self, config: &CollectionConfig) -> Result<bool, VectorStoreError> {
        self.ensured.lock().unwrap().push(config.clone());
        Ok(!self.exists)
    }

    async fn collection_exists(&self) -> Result<bool, VectorStoreError> {
        if self.fail {
            return Err(VectorStoreError::ConnectionFailed("connection refused".to_string()));
        }
        Ok(self.exists)
    }

    async fn upsert(&self, chunks: &[Chunk], _embeddings: &[Embedding]) -> Result<(), VectorStoreError> {
        if self.fail {
            return Err(VectorStoreError::UpsertFailed("connection refused".to_string()));
        }
        self.upserted.lock().unwrap().extend_from_slice(chunks);
        Ok(())
    }

    async fn search(
        &self,
        _embedding: &Embedding,
        top_k: usize,
    ) -> Result<Vec<RetrievedPassage>, VectorStoreError> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(VectorStoreError::SearchFailed("connection refused".to_string()));
        }
        Ok(self.passages.iter().take(top_k).cloned().collect())
    }
}

pub struct FakeLlm {
    reply: Result<String, String>,
    delay: Option<Duration>,
    pub prompts: Mutex<Vec<String>>,
}

impl FakeLlm {
    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(reply.to_string()),
            delay: None,
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: Err("HTTP 500: upstream error".to_string()),
            delay: None,
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn slow(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok("too late".to_string()),
            delay: Some(delay),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl LlmClient for FakeLlm {
    async fn generate(&self, prompt: &str) -> Result<String, LlmClientError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.reply
            .clone()
            .map_err(LlmClientError::ApiRequestFailed)
    }
}

/// Delegates to an in-memory store but refuses to persist bot replies.
pub struct BotReplyFailingRepository {
    inner: InMemoryConversationRepository,
}

impl BotReplyFailingRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: InMemoryConversationRepository::new(),
        })
    }
}

#[async_trait]
impl ConversationRepository for BotReplyFailingRepository {
    async fn list_summaries(&self) -> Result<Vec<ConversationSummary>, RepositoryError> {
        self.inner.list_summaries().await
    }

    async fn get_conversation(&self, id: ConversationId) -> Result<Conversation, RepositoryError> {
        self.inner.get_conversation(id).await
    }

    async fn create_conversation(&self) -> Result<Conversation, RepositoryError> {
        self.inner.create_conversation().await
    }

    async fn append_message(
        &self,
        id: ConversationId,
        sender: Sender,
        text: &str,
    ) -> Result<Message, RepositoryError> {
        if sender == Sender::Bot {
            return Err(RepositoryError::PersistenceFailed("disk full".to_string()));
        }
        self.inner.append_message(id, sender, text).await
    }

    async fn delete_conversation(&self, id: ConversationId) -> Result<bool, RepositoryError> {
        self.inner.delete_conversation(id).await
    }
}

pub fn orchestrator(
    embedder: Arc<FakeEmbedder>,
    store: Arc<FakeVectorStore>,
    llm: Arc<FakeLlm>,
) -> RagOrchestrator {
    RagOrchestrator::new(
        EmbeddingClient::new(embedder, CALL_TIMEOUT),
        RetrievalClient::new(store, CALL_TIMEOUT),
        GenerationClient::new(llm, CALL_TIMEOUT),
    )
}

pub fn chat_service(
    orchestrator: RagOrchestrator,
    repository: Arc<dyn ConversationRepository>,
) -> ChatService {
    ChatService::new(Arc::new(orchestrator), repository)
}
