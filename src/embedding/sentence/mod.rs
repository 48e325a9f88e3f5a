//! Sentence embedder (BERT safetensors + tokenizer, mean pooled).
//!
//! Use [`SentenceConfig::stub`] for tests/examples without model files.

/// Sentence embedder configuration.
pub mod config;
pub(crate) mod model;

#[cfg(test)]
mod tests;

pub use config::{SENTENCE_EMBEDDING_DIM, SENTENCE_MAX_SEQ_LEN, SentenceConfig};

use std::sync::Arc;

use candle_core::{Device, Tensor};
use tracing::{debug, info, warn};

use crate::constants::NORM_EPSILON;
use crate::embedding::device::{device_label, select_device};
use crate::embedding::error::EmbeddingError;
use crate::embedding::utils::load_batch_tokenizer;
use crate::embedding::{Embedder, Vector};

use model::MeanPooledBert;

#[derive(Clone)]
enum EmbedderBackend {
    Model {
        model: MeanPooledBert,
        tokenizer: Arc<tokenizers::Tokenizer>,
        device: Device,
    },
    Stub {
        device: Device,
    },
}

/// Embedding generator for shortlist retrieval (supports stub mode).
///
/// Cloning is cheap: model weights and tokenizer are shared.
#[derive(Clone)]
pub struct SentenceEmbedder {
    backend: EmbedderBackend,
    config: SentenceConfig,
}

impl std::fmt::Debug for SentenceEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentenceEmbedder")
            .field(
                "backend",
                &match &self.backend {
                    EmbedderBackend::Model { device, .. } => format!("Model({:?})", device),
                    EmbedderBackend::Stub { device } => format!("Stub({:?})", device),
                },
            )
            .field("embedding_dim", &self.config.embedding_dim)
            .field("max_seq_len", &self.config.max_seq_len)
            .finish()
    }
}

impl SentenceEmbedder {
    /// Loads the embedder from a config (stub mode is supported).
    pub fn load(mut config: SentenceConfig) -> Result<Self, EmbeddingError> {
        config.validate()?;

        let device = select_device()?;
        debug!(?device, "Selected compute device for sentence embedder");

        if config.testing_stub {
            warn!("Sentence embedder running in STUB mode (testing only)");
            return Ok(Self {
                backend: EmbedderBackend::Stub { device },
                config,
            });
        }

        let tokenizer = load_batch_tokenizer(&config.model_dir, config.max_seq_len).map_err(|e| {
            EmbeddingError::TokenizationFailed {
                reason: format!("Failed to load tokenizer: {}", e),
            }
        })?;

        let model = MeanPooledBert::load(&config.model_dir, &device).map_err(|e| {
            EmbeddingError::ModelLoadFailed {
                reason: format!("Failed to load BERT model: {}", e),
            }
        })?;

        if model.hidden_size() != config.embedding_dim {
            debug!(
                configured = config.embedding_dim,
                hidden_size = model.hidden_size(),
                "Using model hidden size as embedding dimension"
            );
            config.embedding_dim = model.hidden_size();
        }

        info!(
            model_dir = %config.model_dir.display(),
            embedding_dim = config.embedding_dim,
            max_seq_len = config.max_seq_len,
            device = device_label(&device),
            "Sentence embedding model loaded"
        );

        Ok(Self {
            backend: EmbedderBackend::Model {
                model,
                tokenizer: Arc::new(tokenizer),
                device,
            },
            config,
        })
    }

    /// Generates embeddings for a batch of strings (blocking).
    pub fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vector>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        match &self.backend {
            EmbedderBackend::Model {
                model,
                tokenizer,
                device,
            } => {
                let mut results = Vec::with_capacity(texts.len());
                for chunk in texts.chunks(self.config.batch_size) {
                    results.extend(self.embed_chunk_with_model(chunk, model, tokenizer, device)?);
                }
                Ok(results)
            }
            EmbedderBackend::Stub { .. } => Ok(texts
                .iter()
                .map(|text| stub_vector(text, self.config.embedding_dim))
                .collect()),
        }
    }

    fn embed_chunk_with_model(
        &self,
        texts: &[&str],
        model: &MeanPooledBert,
        tokenizer: &tokenizers::Tokenizer,
        device: &Device,
    ) -> Result<Vec<Vector>, EmbeddingError> {
        let encodings = tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| EmbeddingError::TokenizationFailed {
                reason: e.to_string(),
            })?;

        debug!(
            batch = texts.len(),
            seq_len = encodings.first().map(|e| e.len()).unwrap_or(0),
            "Generating embeddings (transformer forward pass)"
        );

        let stack = |rows: Vec<&[u32]>| -> Result<Tensor, EmbeddingError> {
            let rows = rows
                .into_iter()
                .map(|r| Tensor::new(r, device))
                .collect::<candle_core::Result<Vec<_>>>()?;
            Ok(Tensor::stack(&rows, 0)?)
        };

        let input_ids = stack(encodings.iter().map(|e| e.get_ids()).collect())?;
        let type_ids = stack(encodings.iter().map(|e| e.get_type_ids()).collect())?;
        let attention_mask = stack(encodings.iter().map(|e| e.get_attention_mask()).collect())?;

        let pooled = model
            .forward(&input_ids, &type_ids, &attention_mask)
            .map_err(|e| EmbeddingError::InferenceFailed {
                reason: format!("Transformer forward pass failed: {}", e),
            })?;

        Ok(pooled.into_iter().map(l2_normalize).collect())
    }

    /// Returns the output embedding dimension.
    pub fn embedding_dim(&self) -> usize {
        self.config.embedding_dim
    }

    /// Returns `true` if running in stub mode.
    pub fn is_stub(&self) -> bool {
        matches!(self.backend, EmbedderBackend::Stub { .. })
    }

    /// Returns the compute device label (`cpu`, `cuda`, `metal`).
    pub fn device_label(&self) -> &'static str {
        match &self.backend {
            EmbedderBackend::Model { device, .. } | EmbedderBackend::Stub { device } => {
                device_label(device)
            }
        }
    }

    /// Returns the embedder configuration.
    pub fn config(&self) -> &SentenceConfig {
        &self.config
    }
}

impl Embedder for SentenceEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vector>, EmbeddingError> {
        if self.is_stub() {
            let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
            return self.embed_batch(&refs);
        }

        let this = self.clone();
        let owned = texts.to_vec();
        tokio::task::spawn_blocking(move || {
            let refs: Vec<&str> = owned.iter().map(String::as_str).collect();
            this.embed_batch(&refs)
        })
        .await
        .map_err(|e| EmbeddingError::Unavailable {
            reason: format!("embedding task failed: {}", e),
        })?
    }

    fn embedding_dim(&self) -> usize {
        self.config.embedding_dim
    }
}

/// Deterministic pseudo-embedding seeded from the text hash (unit length).
pub(crate) fn stub_vector(text: &str, dim: usize) -> Vector {
    use std::hash::{DefaultHasher, Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    let mut state = hasher.finish();

    let mut embedding = Vec::with_capacity(dim);
    for _ in 0..dim {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
        let value = ((state >> 32) as f32 / u32::MAX as f32) * 2.0 - 1.0;
        embedding.push(value);
    }

    l2_normalize(embedding)
}

pub(crate) fn l2_normalize(mut embedding: Vector) -> Vector {
    let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm > NORM_EPSILON {
        for x in &mut embedding {
            *x /= norm;
        }
    }

    embedding
}
