//! Semdedup library crate (used by the server and integration tests).
//!
//! Finds questions in a pool that mean the same thing as a new question, or
//! groups a whole pool into sets of equivalent questions.
//!
//! # Public API Surface
//!
//! ## Pipeline
//! - [`text::normalize`] - markup stripping before embedding
//! - [`Embedder`], [`SentenceEmbedder`] - text to vectors
//! - [`VectorIndex`] - request-scoped cosine index
//! - [`ShortlistBuilder`], [`Shortlist`], [`PoolPosition`] - top-k retrieval
//! - [`Oracle`], [`GenaiOracle`] - LLM verdicts, with [`oracle::prompt`] and [`oracle::parse`]
//! - [`MatchEngine`] - single-question matching and grouping
//!
//! ## Boundary
//! - [`PoolSource`], [`HttpPoolSource`], [`Question`] - question pools
//! - [`gateway`] - Axum router and handlers
//! - [`Config`] - env-backed server configuration
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod config;
pub mod constants;
pub mod embedding;
pub mod engine;
pub mod gateway;
pub mod index;
pub mod oracle;
pub mod pool;
pub mod shortlist;
pub mod text;

pub use config::{Config, ConfigError};
pub use constants::{DimValidationError, validate_embedding_dim};
#[cfg(any(test, feature = "mock"))]
pub use embedding::MockEmbedder;
pub use embedding::{
    Embedder, EmbeddingError, SENTENCE_EMBEDDING_DIM, SENTENCE_MAX_SEQ_LEN, SentenceConfig,
    SentenceEmbedder, Vector, validate_batch,
};
pub use engine::{
    GroupResult, Match, MatchEngine, MatchError, MatchResult, MatchSettings, MatchStage,
};
pub use index::{IndexError, Neighbor, VectorIndex};
#[cfg(any(test, feature = "mock"))]
pub use oracle::MockOracle;
pub use oracle::{GenaiOracle, Oracle, OracleError};
#[cfg(any(test, feature = "mock"))]
pub use pool::StaticPoolSource;
pub use pool::{DomainPolicy, HttpPoolSource, PoolError, PoolSource, Question};
pub use shortlist::{PoolPosition, Shortlist, ShortlistBuilder, ShortlistEntry, ShortlistError};
