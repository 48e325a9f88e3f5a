//! Scripted oracle for tests.

use std::collections::VecDeque;
use std::time::Duration;

use parking_lot::Mutex;

use crate::oracle::{Oracle, OracleError};

/// In-memory [`Oracle`] that replays canned verdicts and records prompts.
///
/// Queued responses are served first; afterwards the default response repeats.
#[derive(Debug)]
pub struct MockOracle {
    default_response: String,
    queued: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
    fail: bool,
    delay: Option<Duration>,
}

impl MockOracle {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            queued: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(Vec::new()),
            fail: false,
            delay: None,
        }
    }

    /// Every call fails as if the provider were down.
    pub fn unavailable() -> Self {
        Self {
            fail: true,
            ..Self::new("")
        }
    }

    /// Serves `response` once before falling back to the default.
    pub fn then(self, response: impl Into<String>) -> Self {
        self.queued.lock().push_back(response.into());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().len()
    }
}

impl Oracle for MockOracle {
    async fn generate(&self, prompt: &str) -> Result<String, OracleError> {
        self.prompts.lock().push(prompt.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail {
            return Err(OracleError::Unavailable {
                reason: "mock oracle is down".to_string(),
            });
        }

        let next = self.queued.lock().pop_front();
        Ok(next.unwrap_or_else(|| self.default_response.clone()))
    }

    fn model(&self) -> &str {
        "mock"
    }
}
