use std::collections::HashMap;

use crate::pool::{PoolError, PoolSource, Question};

/// Serves fixed pools keyed by locator.
///
/// Unknown locators answer 404, mirroring a missing upstream resource.
#[derive(Debug, Clone, Default)]
pub struct StaticPoolSource {
    pools: HashMap<String, Vec<Question>>,
}

impl StaticPoolSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pool(mut self, locator: impl Into<String>, records: Vec<serde_json::Value>) -> Self {
        self.pools
            .insert(locator.into(), records.into_iter().map(Question::new).collect());
        self
    }

    /// Builds a pool of `{"Question": text}` records.
    pub fn with_texts(self, locator: impl Into<String>, texts: &[&str]) -> Self {
        let records = texts
            .iter()
            .map(|t| serde_json::json!({ "Question": t }))
            .collect();
        self.with_pool(locator, records)
    }
}

impl PoolSource for StaticPoolSource {
    async fn fetch(&self, locator: &str) -> Result<Vec<Question>, PoolError> {
        self.pools
            .get(locator)
            .cloned()
            .ok_or(PoolError::Status { status: 404 })
    }
}
