use genai::Client;
use genai::chat::{ChatMessage, ChatRequest};
use tracing::{debug, error};

use crate::oracle::{Oracle, OracleError};

/// [`Oracle`] backed by a genai chat model.
///
/// Provider credentials (for example `GEMINI_API_KEY`) are resolved by genai
/// from the environment.
#[derive(Clone)]
pub struct GenaiOracle {
    client: Client,
    model: String,
}

impl std::fmt::Debug for GenaiOracle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenaiOracle")
            .field("model", &self.model)
            .finish()
    }
}

impl GenaiOracle {
    pub fn new(model: impl Into<String>) -> Self {
        Self::with_client(Client::default(), model)
    }

    pub fn with_client(client: Client, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

impl Oracle for GenaiOracle {
    async fn generate(&self, prompt: &str) -> Result<String, OracleError> {
        let request = ChatRequest::new(vec![ChatMessage::user(prompt)]);

        debug!(model = %self.model, prompt_len = prompt.len(), "Sending oracle request");
        let response = self
            .client
            .exec_chat(&self.model, request, None)
            .await
            .map_err(|e| {
                error!(model = %self.model, "Oracle request failed: {}", e);
                OracleError::RequestFailed {
                    model: self.model.clone(),
                    reason: e.to_string(),
                }
            })?;

        // No text content reads as an empty verdict.
        Ok(response.first_text().unwrap_or_default().to_string())
    }

    fn model(&self) -> &str {
        &self.model
    }
}
