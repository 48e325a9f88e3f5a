//! Request-scoped exact cosine index.
//!
//! Rows are stored in the order they were given, so a row number is the pool
//! position of the question it was embedded from.

use std::cmp::Ordering;

use thiserror::Error;
use tracing::debug;

use crate::constants::NORM_EPSILON;
use crate::embedding::Vector;


#[derive(Debug, Error, PartialEq)]
pub enum IndexError {
    #[error("cannot build an index from an empty pool")]
    EmptyPool,

    #[error("vector {row} has dimension {actual}, expected {expected}")]
    DimensionMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("invalid query dimension: expected {expected}, got {actual}")]
    InvalidQueryDimension { expected: usize, actual: usize },

    #[error("k must be at least 1")]
    InvalidK,
}

pub type IndexResult<T> = Result<T, IndexError>;

/// One search hit: row number and cosine similarity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub row: usize,
    pub score: f32,
}

/// Flat, read-only-after-build cosine index over unit vectors.
#[derive(Debug, Clone)]
pub struct VectorIndex {
    rows: Vec<Vector>,
    dim: usize,
}

impl VectorIndex {
    /// Normalizes and stores `vectors`. All vectors must share one dimension.
    pub fn build(vectors: Vec<Vector>) -> IndexResult<Self> {
        let dim = match vectors.first() {
            Some(first) => first.len(),
            None => return Err(IndexError::EmptyPool),
        };

        let mut rows = Vec::with_capacity(vectors.len());
        for (row, v) in vectors.into_iter().enumerate() {
            if v.len() != dim {
                return Err(IndexError::DimensionMismatch {
                    row,
                    expected: dim,
                    actual: v.len(),
                });
            }
            rows.push(normalize(v));
        }

        debug!(rows = rows.len(), dim, "Built vector index");
        Ok(Self { rows, dim })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Returns the `min(k, len)` most similar rows, best first.
    ///
    /// Equal scores keep ascending row order.
    pub fn search(&self, query: &[f32], k: usize) -> IndexResult<Vec<Neighbor>> {
        if k == 0 {
            return Err(IndexError::InvalidK);
        }
        if query.len() != self.dim {
            return Err(IndexError::InvalidQueryDimension {
                expected: self.dim,
                actual: query.len(),
            });
        }

        let query = normalize(query.to_vec());

        let mut scored: Vec<Neighbor> = self
            .rows
            .iter()
            .enumerate()
            .map(|(row, v)| Neighbor {
                row,
                score: dot(&query, v),
            })
            .collect();

        // sort_by is stable, so ties stay in row order.
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        scored.truncate(k);

        Ok(scored)
    }
}

#[inline]
fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

fn normalize(mut v: Vector) -> Vector {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt().max(NORM_EPSILON);
    for x in &mut v {
        *x /= norm;
    }
    v
}
