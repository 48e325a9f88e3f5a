use std::path::PathBuf;
use thiserror::Error;

/// Failures loading or running an embedding backend.
///
/// Every variant surfaces to callers as "embedding unavailable"; none is
/// papered over with placeholder vectors.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding model not found at path: {path}")]
    ModelNotFound { path: PathBuf },

    #[error("failed to load embedding model: {reason}")]
    ModelLoadFailed { reason: String },

    #[error("embedding inference failed: {reason}")]
    InferenceFailed { reason: String },

    #[error("tokenization failed: {reason}")]
    TokenizationFailed { reason: String },

    #[error("invalid embedder configuration: {reason}")]
    InvalidConfig { reason: String },

    /// The backend could not be reached or refused the call.
    #[error("embedding backend unavailable: {reason}")]
    Unavailable { reason: String },

    /// Wrong vector count, wrong dimension, or non-finite components.
    #[error("embedding backend returned malformed output: {reason}")]
    MalformedOutput { reason: String },
}

impl From<candle_core::Error> for EmbeddingError {
    fn from(err: candle_core::Error) -> Self {
        EmbeddingError::InferenceFailed {
            reason: err.to_string(),
        }
    }
}

impl From<std::io::Error> for EmbeddingError {
    fn from(err: std::io::Error) -> Self {
        EmbeddingError::ModelLoadFailed {
            reason: err.to_string(),
        }
    }
}
