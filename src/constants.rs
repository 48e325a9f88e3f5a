//! Cross-cutting, shared constants.
//!
//! # Dimension Invariants
//!
//! Every vector compared inside one index must share a dimension. The default below
//! matches the MiniLM family of sentence-transformers; a loaded model overrides it
//! through [`SentenceConfig`](crate::embedding::SentenceConfig). Use
//! [`validate_embedding_dim`] at module boundaries to catch mismatches early.

/// Output dimension of all-MiniLM-L6-v2.
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

/// Max tokens fed to the embedding model per text.
pub const DEFAULT_MAX_SEQ_LEN: usize = 512;

/// Shortlist size handed to the oracle in single-question mode.
pub const DEFAULT_TOP_K: usize = 5;

/// Floor for vector norms before division during cosine normalization.
pub const NORM_EPSILON: f32 = 1e-12;

pub const DEFAULT_ORACLE_MODEL: &str = "gemini-1.5-flash";

pub const DEFAULT_QUESTION_FIELD: &str = "Question";

pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_EMBED_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_ORACLE_TIMEOUT_SECS: u64 = 60;

/// Error returned when dimension validation fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DimValidationError {
    /// Embedding dimension cannot be zero.
    ZeroDimension,
    /// Runtime dimension does not match expected dimension.
    DimensionMismatch { expected: usize, actual: usize },
}

impl std::fmt::Display for DimValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroDimension => write!(f, "embedding dimension cannot be zero"),
            Self::DimensionMismatch { expected, actual } => {
                write!(
                    f,
                    "dimension mismatch: expected {}, got {}",
                    expected, actual
                )
            }
        }
    }
}

impl std::error::Error for DimValidationError {}

/// Validates that a runtime embedding dimension matches the expected dimension.
///
/// # Example
///
/// ```
/// use semdedup::constants::{validate_embedding_dim, DEFAULT_EMBEDDING_DIM};
///
/// validate_embedding_dim(384, DEFAULT_EMBEDDING_DIM).unwrap();
/// assert!(validate_embedding_dim(768, DEFAULT_EMBEDDING_DIM).is_err());
/// ```
pub fn validate_embedding_dim(actual: usize, expected: usize) -> Result<(), DimValidationError> {
    if expected == 0 {
        return Err(DimValidationError::ZeroDimension);
    }
    if actual != expected {
        return Err(DimValidationError::DimensionMismatch { expected, actual });
    }
    Ok(())
}
