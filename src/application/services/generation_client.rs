use std::sync::Arc;
use std::time::Duration;

use tracing::{instrument, warn};

use crate::application::ports::LlmClient;

/// Answer generation with an explicit readiness flag and a bounded call time.
#[derive(Clone)]
pub struct GenerationClient {
    llm: Option<Arc<dyn LlmClient>>,
    timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GenerationFailure {
    #[error("generation provider unavailable")]
    Unavailable,
    #[error("generation failed: {0}")]
    Failed(String),
    #[error("generation timed out after {0:?}")]
    TimedOut(Duration),
    #[error("generation returned no text")]
    EmptyResponse,
}

impl GenerationClient {
    pub fn new(llm: Arc<dyn LlmClient>, timeout: Duration) -> Self {
        Self {
            llm: Some(llm),
            timeout,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            llm: None,
            timeout: Duration::ZERO,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.llm.is_some()
    }

    /// Returns the generated text trimmed of surrounding whitespace.
    #[instrument(skip_all, fields(prompt_chars = prompt.chars().count()))]
    pub async fn generate(&self, prompt: &str) -> Result<String, GenerationFailure> {
        let Some(llm) = &self.llm else {
            warn!("Generation requested but no language model is configured");
            return Err(GenerationFailure::Unavailable);
        };

        match tokio::time::timeout(self.timeout, llm.generate(prompt)).await {
            Ok(Ok(text)) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    warn!("Language model returned an empty completion");
                    Err(GenerationFailure::EmptyResponse)
                } else {
                    Ok(trimmed.to_string())
                }
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Generation call failed");
                Err(GenerationFailure::Failed(e.to_string()))
            }
            Err(_) => {
                warn!(timeout_ms = self.timeout.as_millis() as u64, "Generation call timed out");
                Err(GenerationFailure::TimedOut(self.timeout))
            }
        }
    }
}
