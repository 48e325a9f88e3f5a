use std::sync::Arc;

use crate::embedding::Embedder;
use crate::engine::MatchEngine;
use crate::oracle::Oracle;
use crate::pool::PoolSource;

pub struct HandlerState<E, O, S>
where
    E: Embedder + 'static,
    O: Oracle + 'static,
    S: PoolSource + 'static,
{
    pub engine: Arc<MatchEngine<E, O>>,

    pub pool_source: Arc<S>,

    /// `"stub"` or `"real"`, reported by `/ready`.
    pub embedder_mode: &'static str,
}

impl<E, O, S> Clone for HandlerState<E, O, S>
where
    E: Embedder + 'static,
    O: Oracle + 'static,
    S: PoolSource + 'static,
{
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            pool_source: Arc::clone(&self.pool_source),
            embedder_mode: self.embedder_mode,
        }
    }
}

impl<E, O, S> HandlerState<E, O, S>
where
    E: Embedder + 'static,
    O: Oracle + 'static,
    S: PoolSource + 'static,
{
    pub fn new(engine: MatchEngine<E, O>, pool_source: S) -> Self {
        Self {
            engine: Arc::new(engine),
            pool_source: Arc::new(pool_source),
            embedder_mode: "real",
        }
    }

    pub fn with_stub_embedder(mut self, is_stub: bool) -> Self {
        self.embedder_mode = if is_stub { "stub" } else { "real" };
        self
    }
}
