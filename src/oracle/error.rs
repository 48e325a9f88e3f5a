use thiserror::Error;

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("oracle model '{model}' request failed: {reason}")]
    RequestFailed { model: String, reason: String },

    #[error("oracle unavailable: {reason}")]
    Unavailable { reason: String },
}
