//! Generative-model oracle: prompt rendering, the client seam, and verdict parsing.
//!
//! - [`Oracle`] is the seam the engine depends on.
//! - [`GenaiOracle`] talks to a hosted chat model through genai.
//! - [`prompt`] and [`parse`] agree on 1-based numbering.

mod client;
mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod parse;
pub mod prompt;


pub use client::GenaiOracle;
pub use error::OracleError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockOracle;
pub use parse::{parse_group_verdict, parse_match_verdict};
pub use prompt::{grouping_prompt, match_prompt};

use std::future::Future;

/// Free-text generator used as the final semantic judge.
pub trait Oracle: Send + Sync {
    /// Returns the raw verdict text for `prompt`.
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, OracleError>> + Send;

    /// Model identifier, for logs and readiness reports.
    fn model(&self) -> &str;
}
