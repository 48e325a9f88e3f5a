use std::time::Duration;

use reqwest::{Client, Url};
use tracing::{debug, error, warn};

use crate::pool::{PoolError, PoolSource, Question};

const USER_AGENT: &str = concat!("semdedup/", env!("CARGO_PKG_VERSION"));

/// Host allow-list for question URLs. Empty means every host is allowed.
#[derive(Debug, Clone, Default)]
pub struct DomainPolicy {
    allowed: Vec<String>,
}

impl DomainPolicy {
    pub fn new(allowed: Vec<String>) -> Self {
        Self { allowed }
    }

    pub fn allow_all() -> Self {
        Self::default()
    }

    pub fn allowed(&self) -> &[String] {
        &self.allowed
    }

    pub fn is_unrestricted(&self) -> bool {
        self.allowed.is_empty()
    }

    /// Parses `url` and checks its host. A host passes if it contains any allowed entry.
    pub fn check(&self, url: &str) -> Result<Url, PoolError> {
        let parsed = Url::parse(url).map_err(|e| PoolError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(PoolError::InvalidUrl {
                url: url.to_string(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        let host = parsed.host_str().unwrap_or_default().to_string();
        if host.is_empty() {
            return Err(PoolError::InvalidUrl {
                url: url.to_string(),
                reason: "missing host".to_string(),
            });
        }

        if self.is_unrestricted() || self.allowed.iter().any(|d| host.contains(d.as_str())) {
            Ok(parsed)
        } else {
            warn!(host = %host, "Rejected questions url outside allowed domains");
            Err(PoolError::DomainNotAllowed { host })
        }
    }
}

/// Fetches a JSON array of question records over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpPoolSource {
    client: Client,
    policy: DomainPolicy,
}

impl HttpPoolSource {
    pub fn new(policy: DomainPolicy, timeout: Duration) -> Result<Self, PoolError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| PoolError::Request {
                reason: format!("failed to build http client: {}", e),
            })?;

        Ok(Self { client, policy })
    }

    pub fn policy(&self) -> &DomainPolicy {
        &self.policy
    }
}

impl PoolSource for HttpPoolSource {
    async fn fetch(&self, locator: &str) -> Result<Vec<Question>, PoolError> {
        let url = self.policy.check(locator)?;

        debug!(url = %url, "Fetching question pool");
        let response = self.client.get(url).send().await.map_err(|e| {
            error!("Failed to fetch questions: {}", e);
            PoolError::Request {
                reason: e.to_string(),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            error!(status = status.as_u16(), "Question source returned an error status");
            return Err(PoolError::Status {
                status: status.as_u16(),
            });
        }

        let body: serde_json::Value = response.json().await.map_err(|e| PoolError::Decode {
            reason: e.to_string(),
        })?;

        match body {
            serde_json::Value::Array(records) => {
                debug!(pool_size = records.len(), "Fetched question pool");
                Ok(records.into_iter().map(Question::new).collect())
            }
            other => Err(PoolError::Decode {
                reason: format!("expected a JSON array, got {}", json_kind(&other)),
            }),
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
