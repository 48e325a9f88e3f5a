//! Scripted embedder for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::embedding::sentence::stub_vector;
use crate::embedding::{Embedder, EmbeddingError, Vector};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MockMode {
    Normal,
    Unavailable,
    /// Returns one vector fewer than requested.
    DropLast,
    /// Returns zero-length vectors.
    Empty,
}

/// In-memory [`Embedder`] with per-text overrides.
///
/// Texts without an override get the deterministic stub vector for their content.
#[derive(Debug)]
pub struct MockEmbedder {
    dim: usize,
    vectors: HashMap<String, Vector>,
    mode: MockMode,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockEmbedder {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            vectors: HashMap::new(),
            mode: MockMode::Normal,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Pins the vector returned for `text`. The vector length must equal the mock's dim.
    pub fn with_vector(mut self, text: impl Into<String>, vector: Vector) -> Self {
        self.vectors.insert(text.into(), vector);
        self
    }

    /// Every call fails as if the backend were down.
    pub fn unavailable(mut self) -> Self {
        self.mode = MockMode::Unavailable;
        self
    }

    /// Every call returns one vector fewer than requested.
    pub fn dropping_last(mut self) -> Self {
        self.mode = MockMode::DropLast;
        self
    }

    /// Every call returns empty vectors.
    pub fn returning_empty_vectors(mut self) -> Self {
        self.mode = MockMode::Empty;
        self
    }

    /// Sleeps before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of `embed` calls observed.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn vector_for(&self, text: &str) -> Vector {
        self.vectors
            .get(text)
            .cloned()
            .unwrap_or_else(|| stub_vector(text, self.dim))
    }
}

impl Embedder for MockEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vector>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.mode {
            MockMode::Unavailable => Err(EmbeddingError::Unavailable {
                reason: "mock backend is down".to_string(),
            }),
            MockMode::DropLast => {
                let mut out: Vec<Vector> = texts.iter().map(|t| self.vector_for(t)).collect();
                out.pop();
                Ok(out)
            }
            MockMode::Empty => Ok(texts.iter().map(|_| Vec::new()).collect()),
            MockMode::Normal => Ok(texts.iter().map(|t| self.vector_for(t)).collect()),
        }
    }

    fn embedding_dim(&self) -> usize {
        self.dim
    }
}
