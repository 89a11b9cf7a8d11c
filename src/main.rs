use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use ragline::application::ports::{ConversationRepository, VectorStore};
use ragline::application::services::{
    ChatService, EmbeddingClient, GenerationClient, RagOrchestrator, RetrievalClient,
};
use ragline::infrastructure::llm::{EmbedderFactory, create_chat_completions_client};
use ragline::infrastructure::observability::{TracingConfig, init_tracing};
use ragline::infrastructure::persistence::{
    InMemoryConversationRepository, JsonFileConversationRepository, QdrantAdapter,
};
use ragline::presentation::config::{EmbeddingsSettings, LlmSettings, QdrantSettings};
use ragline::presentation::{AppState, Environment, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment).context("Failed to load settings")?;

    init_tracing(&TracingConfig::from_settings(environment, &settings.logging));

    let conversation_repository = open_conversation_repository(&settings).await?;

    let orchestrator = Arc::new(RagOrchestrator::new(
        build_embedding_client(&settings.embeddings).await,
        build_retrieval_client(&settings.qdrant).await,
        build_generation_client(&settings.llm),
    ));

    let readiness = orchestrator.readiness();
    tracing::info!(
        embedding_ready = readiness.embedding,
        retrieval_ready = readiness.retrieval,
        generation_ready = readiness.generation,
        "RAG pipeline assembled"
    );

    let chat_service = Arc::new(ChatService::new(
        orchestrator,
        Arc::clone(&conversation_repository),
    ));

    let state = AppState {
        chat_service,
        conversation_repository,
    };

    let router = create_router(state, &settings.server.cors_origins);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("Invalid server host/port")?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// A corrupt history file stops startup; it is never silently replaced.
async fn open_conversation_repository(
    settings: &Settings,
) -> anyhow::Result<Arc<dyn ConversationRepository>> {
    match settings.storage.history_path() {
        Some(path) => {
            let repository = JsonFileConversationRepository::open(path)
                .await
                .with_context(|| format!("Failed to open chat history at {}", path.display()))?;
            Ok(Arc::new(repository))
        }
        None => {
            tracing::warn!("No history_path configured; chat history will not survive restarts");
            Ok(Arc::new(InMemoryConversationRepository::new()))
        }
    }
}

async fn build_embedding_client(settings: &EmbeddingsSettings) -> EmbeddingClient {
    match EmbedderFactory::create(settings).await {
        Ok(embedder) => EmbeddingClient::new(embedder, settings.timeout()),
        Err(e) => {
            tracing::warn!(error = %e, model = %settings.model, "Embedding model unavailable");
            EmbeddingClient::unavailable()
        }
    }
}

async fn build_retrieval_client(settings: &QdrantSettings) -> RetrievalClient {
    match QdrantAdapter::new(
        &settings.url,
        settings.api_key.clone(),
        settings.collection_name.clone(),
    ) {
        Ok(adapter) => {
            let store: Arc<dyn VectorStore> = Arc::new(adapter);
            RetrievalClient::probe(store, settings.timeout()).await
        }
        Err(e) => {
            tracing::warn!(error = %e, url = %settings.url, "Vector index client unavailable");
            RetrievalClient::unavailable()
        }
    }
}

fn build_generation_client(settings: &LlmSettings) -> GenerationClient {
    match create_chat_completions_client(settings) {
        Ok(client) => {
            tracing::info!(provider = %settings.provider, model = %client.model(), "Generation model configured");
            GenerationClient::new(Arc::new(client), settings.timeout())
        }
        Err(e) => {
            tracing::warn!(error = %e, provider = %settings.provider, "Generation model unavailable");
            GenerationClient::unavailable()
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}
