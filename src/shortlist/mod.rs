//! Shortlist construction: normalize, embed, index, search.
//!
//! [`Shortlist::resolve`] is the only place a 1-based oracle rank turns into a
//! pool position. Everything downstream works in [`PoolPosition`]s.

use std::fmt;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use crate::embedding::{Embedder, EmbeddingError, validate_batch};
use crate::index::{IndexError, VectorIndex};
use crate::text;

#[cfg(test)]
mod tests;

/// Zero-based index into the original pool ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoolPosition(usize);

impl PoolPosition {
    pub fn new(position: usize) -> Self {
        Self(position)
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for PoolPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShortlistEntry {
    pub position: PoolPosition,
    pub score: f32,
}

/// Top-k pool items for one query, best first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shortlist {
    entries: Vec<ShortlistEntry>,
}

impl Shortlist {
    pub fn new(entries: Vec<ShortlistEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[ShortlistEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShortlistEntry> {
        self.entries.iter()
    }

    /// Maps a 1-based rank, as enumerated in the oracle prompt, to its entry.
    pub fn resolve(&self, rank: usize) -> Option<&ShortlistEntry> {
        rank.checked_sub(1).and_then(|i| self.entries.get(i))
    }
}

/// Which embedding call a shortlist failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedTarget {
    Pool,
    Query,
}

impl fmt::Display for EmbedTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pool => write!(f, "pool"),
            Self::Query => write!(f, "query"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ShortlistError {
    #[error("embedding {target} failed: {source}")]
    Embedding {
        target: EmbedTarget,
        #[source]
        source: EmbeddingError,
    },

    #[error("embedding {target} timed out after {timeout:?}")]
    Timeout {
        target: EmbedTarget,
        timeout: Duration,
    },

    #[error("building index failed: {0}")]
    Build(#[source] IndexError),

    #[error("searching index failed: {0}")]
    Search(#[source] IndexError),
}

/// Builds a [`Shortlist`] for a query against a pool of raw texts.
#[derive(Debug)]
pub struct ShortlistBuilder<'a, E> {
    embedder: &'a E,
    k: usize,
    embed_timeout: Duration,
}

impl<'a, E: Embedder> ShortlistBuilder<'a, E> {
    pub fn new(embedder: &'a E, k: usize, embed_timeout: Duration) -> Self {
        Self {
            embedder,
            k,
            embed_timeout,
        }
    }

    /// Runs the pipeline. `pool` and `query` are raw (possibly HTML) texts.
    pub async fn build(&self, pool: &[&str], query: &str) -> Result<Shortlist, ShortlistError> {
        if pool.is_empty() {
            return Err(ShortlistError::Build(IndexError::EmptyPool));
        }

        let pool_texts: Vec<String> = pool.iter().map(|t| text::normalize(Some(*t))).collect();
        let query_text = text::normalize(Some(query));

        debug!(pool_size = pool_texts.len(), "Embedding pool");
        let pool_vectors = self.embed(&pool_texts, EmbedTarget::Pool).await?;
        let index = VectorIndex::build(pool_vectors).map_err(ShortlistError::Build)?;

        debug!("Embedding query");
        let mut query_vectors = self.embed(&[query_text], EmbedTarget::Query).await?;
        let query_vector = query_vectors.pop().unwrap_or_default();

        let hits = index
            .search(&query_vector, self.k)
            .map_err(ShortlistError::Search)?;
        debug!(k = self.k, hits = hits.len(), "Searched vector index");

        // Index rows were built in pool order, so row == pool position.
        Ok(Shortlist::new(
            hits.into_iter()
                .map(|hit| ShortlistEntry {
                    position: PoolPosition::new(hit.row),
                    score: hit.score,
                })
                .collect(),
        ))
    }

    async fn embed(
        &self,
        texts: &[String],
        target: EmbedTarget,
    ) -> Result<Vec<Vec<f32>>, ShortlistError> {
        let vectors = tokio::time::timeout(self.embed_timeout, self.embedder.embed(texts))
            .await
            .map_err(|_| ShortlistError::Timeout {
                target,
                timeout: self.embed_timeout,
            })?
            .map_err(|source| ShortlistError::Embedding { target, source })?;

        validate_batch(texts.len(), self.embedder.embedding_dim(), &vectors)
            .map_err(|source| ShortlistError::Embedding { target, source })?;

        Ok(vectors)
    }
}
