use std::path::PathBuf;

use crate::embedding::error::EmbeddingError;

/// Default sentence embedding dimension.
pub const SENTENCE_EMBEDDING_DIM: usize = crate::constants::DEFAULT_EMBEDDING_DIM;

/// Default sentence max sequence length.
pub const SENTENCE_MAX_SEQ_LEN: usize = crate::constants::DEFAULT_MAX_SEQ_LEN;

/// Files a model directory must contain.
pub const REQUIRED_MODEL_FILES: [&str; 3] = ["config.json", "model.safetensors", "tokenizer.json"];

#[derive(Debug, Clone)]
/// Configuration for [`SentenceEmbedder`](super::SentenceEmbedder).
pub struct SentenceConfig {
    /// Directory holding `config.json`, `model.safetensors` and `tokenizer.json`.
    pub model_dir: PathBuf,
    /// Max tokens to consider per text.
    pub max_seq_len: usize,
    /// Output dimension in stub mode; replaced by the model's hidden size on load.
    pub embedding_dim: usize,
    /// Texts per forward pass.
    pub batch_size: usize,
    /// If true, run in deterministic stub mode (no model files required).
    pub testing_stub: bool,
}

impl Default for SentenceConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::new(),
            max_seq_len: SENTENCE_MAX_SEQ_LEN,
            embedding_dim: SENTENCE_EMBEDDING_DIM,
            batch_size: 32,
            testing_stub: false,
        }
    }
}

impl SentenceConfig {
    /// Creates a config for a model directory.
    pub fn new<P: Into<PathBuf>>(model_dir: P) -> Self {
        Self {
            model_dir: model_dir.into(),
            ..Default::default()
        }
    }

    /// Creates a stub config (no model files; produces deterministic embeddings).
    pub fn stub() -> Self {
        Self {
            testing_stub: true,
            ..Default::default()
        }
    }

    /// Overrides the stub output dimension.
    pub fn with_embedding_dim(mut self, embedding_dim: usize) -> Self {
        self.embedding_dim = embedding_dim;
        self
    }

    /// Validates required fields for the selected mode.
    pub fn validate(&self) -> Result<(), EmbeddingError> {
        if self.embedding_dim == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "embedding_dim must be greater than zero".to_string(),
            });
        }

        if self.batch_size == 0 || self.max_seq_len == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "batch_size and max_seq_len must be greater than zero".to_string(),
            });
        }

        if self.testing_stub {
            return Ok(());
        }

        if self.model_dir.as_os_str().is_empty() {
            return Err(EmbeddingError::InvalidConfig {
                reason: "model_dir is required (stubbing is disabled)".to_string(),
            });
        }

        if !self.model_dir.is_dir() {
            return Err(EmbeddingError::ModelNotFound {
                path: self.model_dir.clone(),
            });
        }

        if let Some(missing) = self.missing_files().first() {
            return Err(EmbeddingError::ModelNotFound {
                path: self.model_dir.join(missing),
            });
        }

        Ok(())
    }

    /// Returns the required model files absent from `model_dir`.
    pub fn missing_files(&self) -> Vec<&'static str> {
        REQUIRED_MODEL_FILES
            .into_iter()
            .filter(|f| !self.model_dir.join(f).is_file())
            .collect()
    }
}
