use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::engine::MatchError;
use crate::gateway::status::SEMDEDUP_STATUS_HEADER;
use crate::pool::PoolError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("URL not allowed. Please use an approved API endpoint.")]
    DomainNotAllowed,

    #[error("No questions were found at the provided URL")]
    EmptyPool,

    #[error("upstream fetch failed: {0}")]
    UpstreamFetch(String),

    #[error("embedding unavailable: {0}")]
    EmbeddingUnavailable(String),

    #[error("oracle unavailable: {0}")]
    OracleUnavailable(String),

    #[error("timed out: {0}")]
    Timeout(String),

    #[error("internal error: {0}")]
    InternalError(String),
}

impl From<MatchError> for GatewayError {
    fn from(err: MatchError) -> Self {
        match err {
            MatchError::InvalidInput { reason } => GatewayError::InvalidRequest(reason),
            MatchError::UpstreamFetch(PoolError::DomainNotAllowed { .. }) => {
                GatewayError::DomainNotAllowed
            }
            MatchError::UpstreamFetch(e @ PoolError::InvalidUrl { .. }) => {
                GatewayError::InvalidRequest(e.to_string())
            }
            MatchError::UpstreamFetch(e) => GatewayError::UpstreamFetch(e.to_string()),
            MatchError::EmptyPool => GatewayError::EmptyPool,
            MatchError::EmbeddingUnavailable(e) => {
                GatewayError::EmbeddingUnavailable(e.to_string())
            }
            MatchError::OracleUnavailable(e) => GatewayError::OracleUnavailable(e.to_string()),
            e @ MatchError::Timeout { .. } => GatewayError::Timeout(e.to_string()),
            e @ MatchError::Index { .. } => GatewayError::InternalError(e.to_string()),
        }
    }
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        // Upstream and internal details go to the log, not the caller.
        let (status, error_message, semdedup_status) = match &self {
            GatewayError::InvalidRequest(_) => {
                (StatusCode::BAD_REQUEST, self.to_string(), "invalid_request")
            }
            GatewayError::DomainNotAllowed => {
                (StatusCode::FORBIDDEN, self.to_string(), "domain_not_allowed")
            }
            GatewayError::EmptyPool => (StatusCode::NOT_FOUND, self.to_string(), "empty_pool"),
            GatewayError::UpstreamFetch(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Could not retrieve questions from the provided URL".to_string(),
                "upstream_error",
            ),
            GatewayError::EmbeddingUnavailable(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Embedding service unavailable".to_string(),
                "embedding_unavailable",
            ),
            GatewayError::OracleUnavailable(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Language model unavailable".to_string(),
                "oracle_unavailable",
            ),
            GatewayError::Timeout(_) => (
                StatusCode::GATEWAY_TIMEOUT,
                "Request timed out".to_string(),
                "timeout",
            ),
            GatewayError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An internal server error occurred".to_string(),
                "internal_error",
            ),
        };

        if status.is_server_error() {
            error!(status = status.as_u16(), "{}", self);
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            SEMDEDUP_STATUS_HEADER,
            HeaderValue::from_static(semdedup_status),
        );

        let body = Json(ErrorResponse {
            error: error_message,
            code: status.as_u16(),
        });

        (status, headers, body).into_response()
    }
}
