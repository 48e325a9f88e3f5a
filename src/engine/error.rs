use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::embedding::EmbeddingError;
use crate::index::IndexError;
use crate::oracle::OracleError;
use crate::pool::PoolError;

/// Pipeline stage, used for logging and to say where a timeout happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStage {
    Fetching,
    Normalizing,
    EmbeddingPool,
    Indexing,
    EmbeddingQuery,
    Searching,
    Prompting,
    Parsing,
}

impl fmt::Display for MatchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Fetching => "fetching",
            Self::Normalizing => "normalizing",
            Self::EmbeddingPool => "embedding_pool",
            Self::Indexing => "indexing",
            Self::EmbeddingQuery => "embedding_query",
            Self::Searching => "searching",
            Self::Prompting => "prompting",
            Self::Parsing => "parsing",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error(transparent)]
    UpstreamFetch(#[from] PoolError),

    #[error("embedding service unavailable: {0}")]
    EmbeddingUnavailable(#[source] EmbeddingError),

    #[error("no questions found in pool")]
    EmptyPool,

    #[error("oracle unavailable: {0}")]
    OracleUnavailable(#[from] OracleError),

    #[error("{stage} timed out after {timeout:?}")]
    Timeout { stage: MatchStage, timeout: Duration },

    #[error("{stage} failed: {source}")]
    Index {
        stage: MatchStage,
        #[source]
        source: IndexError,
    },
}
