//! Question pools and where they come from.

mod error;
mod http;
#[cfg(any(test, feature = "mock"))]
pub mod mock;

#[cfg(test)]
mod tests;

pub use error::PoolError;
pub use http::{DomainPolicy, HttpPoolSource};
#[cfg(any(test, feature = "mock"))]
pub use mock::StaticPoolSource;

use std::future::Future;

use serde::{Deserialize, Serialize};

/// One pool record, kept verbatim so callers get back exactly what they sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Question(serde_json::Value);

impl Question {
    pub fn new(record: serde_json::Value) -> Self {
        Self(record)
    }

    /// Text stored under `field`, if the record is an object holding a string there.
    pub fn text(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(serde_json::Value::as_str)
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn into_value(self) -> serde_json::Value {
        self.0
    }
}

impl From<serde_json::Value> for Question {
    fn from(record: serde_json::Value) -> Self {
        Self(record)
    }
}

/// Resolves an opaque locator to a question pool.
pub trait PoolSource: Send + Sync {
    fn fetch(
        &self,
        locator: &str,
    ) -> impl Future<Output = Result<Vec<Question>, PoolError>> + Send;
}
