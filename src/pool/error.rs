use thiserror::Error;

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("invalid questions url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("host '{host}' is not in the allowed domain list")]
    DomainNotAllowed { host: String },

    #[error("failed to fetch questions: {reason}")]
    Request { reason: String },

    #[error("question source answered with status {status}")]
    Status { status: u16 },

    #[error("question source returned an invalid body: {reason}")]
    Decode { reason: String },
}
