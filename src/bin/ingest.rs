use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, bail};

use ragline::application::services::IngestionService;
use ragline::domain::ContentType;
use ragline::infrastructure::llm::EmbedderFactory;
use ragline::infrastructure::observability::{TracingConfig, init_tracing};
use ragline::infrastructure::persistence::QdrantAdapter;
use ragline::infrastructure::text_processing::{PlainTextAdapter, SentenceSplitter};
use ragline::presentation::{Environment, Settings};

/// Loads the given documents into the knowledge base: `ingest <file>...`
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment).context("Failed to load settings")?;

    init_tracing(&TracingConfig::from_settings(environment, &settings.logging));

    let paths: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    if paths.is_empty() {
        bail!("usage: ingest <file>...");
    }

    let embedder = EmbedderFactory::create(&settings.embeddings)
        .await
        .context("Failed to load embedding model")?;
    let vector_store = QdrantAdapter::new(
        &settings.qdrant.url,
        settings.qdrant.api_key.clone(),
        settings.qdrant.collection_name.clone(),
    )
    .context("Failed to create Qdrant client")?;

    let service = IngestionService::new(
        Arc::new(PlainTextAdapter),
        embedder,
        Arc::new(vector_store),
        Arc::new(SentenceSplitter::default()),
    );

    let mut succeeded = 0usize;
    let mut total_chunks = 0usize;

    for path in &paths {
        match ingest_file(&service, path).await {
            Ok(chunks) => {
                succeeded += 1;
                total_chunks += chunks;
                tracing::info!(file = %path.display(), chunks, "Ingested");
            }
            Err(e) => {
                tracing::error!(file = %path.display(), error = %format!("{:#}", e), "Ingestion failed");
            }
        }
    }

    tracing::info!(
        files = paths.len(),
        succeeded,
        failed = paths.len() - succeeded,
        chunks = total_chunks,
        "Ingestion finished"
    );

    if succeeded < paths.len() {
        bail!("{} of {} files failed", paths.len() - succeeded, paths.len());
    }
    Ok(())
}

async fn ingest_file(service: &IngestionService, path: &Path) -> anyhow::Result<usize> {
    let content_type = ContentType::from_path(path)
        .with_context(|| format!("Unsupported file extension: {}", path.display()))?;
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let report = service.ingest(&data, filename, content_type).await?;
    Ok(report.chunks)
}
