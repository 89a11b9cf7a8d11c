use std::sync::Arc;

use async_trait::async_trait;
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use hf_hub::api::sync::Api;
use hf_hub::{Repo, RepoType};
use tokenizers::Tokenizer;

use crate::application::ports::{Embedder, EmbedderError};
use crate::domain::Embedding;

/// Sentence-transformers style embedder (BERT encoder, mean pooling, L2 normalization)
/// running in-process on Candle. Inference runs on the blocking pool.
pub struct LocalCandleEmbedder {
    encoder: Arc<BertEncoder>,
}

struct BertEncoder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
}

impl LocalCandleEmbedder {
    /// Downloads (or reuses the cached copy of) `model_id` from the Hugging Face hub and
    /// loads it. Blocking; call from a blocking context.
    pub fn load(model_id: &str) -> Result<Self, EmbedderError> {
        let device = Device::Cpu;

        tracing::info!(
            device = ?device,
            model = model_id,
            "Loading local embedding model"
        );

        let api = Api::new().map_err(|e| EmbedderError::ModelLoadFailed(e.to_string()))?;
        let repo = api.repo(Repo::new(model_id.to_string(), RepoType::Model));

        let fetch = |file: &str| {
            repo.get(file)
                .map_err(|e| EmbedderError::ModelLoadFailed(format!("{}: {}", file, e)))
        };
        let config_path = fetch("config.json")?;
        let tokenizer_path = fetch("tokenizer.json")?;
        let weights_path = fetch("model.safetensors")?;

        let config_contents = std::fs::read_to_string(&config_path)
            .map_err(|e| EmbedderError::ModelLoadFailed(format!("read config: {}", e)))?;
        let config: BertConfig = serde_json::from_str(&config_contents)
            .map_err(|e| EmbedderError::ModelLoadFailed(format!("parse config: {}", e)))?;

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| EmbedderError::ModelLoadFailed(format!("tokenizer: {}", e)))?;
        tokenizer
            .with_truncation(Some(tokenizers::TruncationParams {
                max_length: config.max_position_embeddings,
                ..Default::default()
            }))
            .map_err(|e| EmbedderError::ModelLoadFailed(format!("truncation config: {}", e)))?;

        // SAFETY: safetensors files are memory-mapped read-only
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, &device)
                .map_err(|e| EmbedderError::ModelLoadFailed(format!("weights: {}", e)))?
        };

        let model = BertModel::load(vb, &config)
            .map_err(|e| EmbedderError::ModelLoadFailed(format!("model: {}", e)))?;

        tracing::info!(model = model_id, "Local embedding model loaded");

        Ok(Self {
            encoder: Arc::new(BertEncoder {
                model,
                tokenizer,
                device,
            }),
        })
    }

    async fn encode_owned(&self, texts: Vec<String>) -> Result<Vec<Embedding>, EmbedderError> {
        let encoder = Arc::clone(&self.encoder);
        tokio::task::spawn_blocking(move || {
            let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
            encoder.encode(&refs)
        })
        .await
        .map_err(|e| EmbedderError::InferenceFailed(format!("inference task: {}", e)))?
    }
}

fn inference<E: std::fmt::Display>(e: E) -> EmbedderError {
    EmbedderError::InferenceFailed(e.to_string())
}

impl BertEncoder {
    fn encode(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbedderError> {
        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| EmbedderError::InferenceFailed(format!("tokenization: {}", e)))?;

        let max_len = encodings
            .iter()
            .map(|e| e.get_ids().len())
            .max()
            .unwrap_or(0);

        let mut input_ids = Vec::with_capacity(texts.len() * max_len);
        let mut type_ids = Vec::with_capacity(texts.len() * max_len);
        let mut attention = Vec::with_capacity(texts.len() * max_len);

        for encoding in &encodings {
            let pad_len = max_len - encoding.get_ids().len();

            input_ids.extend_from_slice(encoding.get_ids());
            input_ids.extend(std::iter::repeat_n(0u32, pad_len));
            type_ids.extend_from_slice(encoding.get_type_ids());
            type_ids.extend(std::iter::repeat_n(0u32, pad_len));
            attention.extend_from_slice(encoding.get_attention_mask());
            attention.extend(std::iter::repeat_n(0u32, pad_len));
        }

        let batch_size = texts.len();
        let shape = (batch_size, max_len);
        let input_ids = Tensor::from_vec(input_ids, shape, &self.device).map_err(inference)?;
        let type_ids = Tensor::from_vec(type_ids, shape, &self.device).map_err(inference)?;
        let attention = Tensor::from_vec(attention, shape, &self.device).map_err(inference)?;

        let hidden = self
            .model
            .forward(&input_ids, &type_ids, Some(&attention))
            .map_err(inference)?;

        // Mean pooling over non-padding tokens
        let mask = attention.to_dtype(DType::F32).map_err(inference)?;
        let summed = hidden
            .broadcast_mul(&mask.unsqueeze(2).map_err(inference)?)
            .and_then(|t| t.sum(1))
            .map_err(inference)?;
        let counts = mask
            .sum(1)
            .and_then(|t| t.unsqueeze(1))
            .map_err(inference)?;
        let pooled = summed.broadcast_div(&counts).map_err(inference)?;

        (0..batch_size)
            .map(|i| {
                let values: Vec<f32> = pooled
                    .get(i)
                    .and_then(|row| row.to_vec1())
                    .map_err(inference)?;
                Ok(Embedding::new(values).normalized())
            })
            .collect()
    }
}

#[async_trait]
impl Embedder for LocalCandleEmbedder {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbedderError> {
        self.encode_owned(vec![text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| EmbedderError::InferenceFailed("empty result".to_string()))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbedderError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.encode_owned(texts.iter().map(|t| (*t).to_string()).collect())
            .await
    }
}
