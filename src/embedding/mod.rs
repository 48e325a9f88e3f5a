//! Embedding + model utilities.
//!
//! - [`Embedder`] is the seam the matching pipeline depends on.
//! - [`sentence`] provides the candle-backed sentence embedder (with stub mode).
//! - [`MockEmbedder`] is a scripted test double (behind `mock`).

/// Device selection (CPU / Metal / CUDA).
pub mod device;
mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
/// Sentence-transformer embedder.
pub mod sentence;
/// Tokenizer loading helpers.
pub mod utils;


pub use error::EmbeddingError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockEmbedder;
pub use sentence::{SENTENCE_EMBEDDING_DIM, SENTENCE_MAX_SEQ_LEN, SentenceConfig, SentenceEmbedder};

use std::future::Future;

use crate::constants::validate_embedding_dim;

/// Fixed-length embedding vector.
pub type Vector = Vec<f32>;

/// Maps texts to vectors: one per input, same order, fixed dimension.
///
/// Implementations must be deterministic for identical input and must report
/// failure instead of substituting placeholder vectors.
pub trait Embedder: Send + Sync {
    /// Embeds a batch of texts.
    fn embed(
        &self,
        texts: &[String],
    ) -> impl Future<Output = Result<Vec<Vector>, EmbeddingError>> + Send;

    /// Dimension of every vector this embedder returns.
    fn embedding_dim(&self) -> usize;
}

/// Checks a backend response against its request before anything uses it.
pub fn validate_batch(
    expected_count: usize,
    expected_dim: usize,
    vectors: &[Vector],
) -> Result<(), EmbeddingError> {
    if vectors.len() != expected_count {
        return Err(EmbeddingError::MalformedOutput {
            reason: format!(
                "expected {} vectors, got {}",
                expected_count,
                vectors.len()
            ),
        });
    }

    for (i, v) in vectors.iter().enumerate() {
        validate_embedding_dim(v.len(), expected_dim).map_err(|e| {
            EmbeddingError::MalformedOutput {
                reason: format!("vector {}: {}", i, e),
            }
        })?;

        if v.iter().any(|x| !x.is_finite()) {
            return Err(EmbeddingError::MalformedOutput {
                reason: format!("vector {} contains non-finite values", i),
            });
        }
    }

    Ok(())
}
