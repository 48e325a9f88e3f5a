use std::path::PathBuf;
use thiserror::Error;

/// Startup configuration failures. The server refuses to start on any of these.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `SEMDEDUP_PORT` was `0`.
    #[error("invalid port '{value}': must be between 1 and 65535")]
    InvalidPort { value: String },

    #[error("failed to parse port '{value}': {source}")]
    PortParseError {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("failed to parse bind address '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },

    /// Non-numeric, zero, or blank value for a tunable.
    #[error("invalid value for {name}: '{value}'")]
    InvalidValue { name: &'static str, value: String },

    /// `SEMDEDUP_MODEL_PATH` points nowhere.
    #[error("model path does not exist: {path}")]
    PathNotFound { path: PathBuf },

    /// `SEMDEDUP_MODEL_PATH` must name the model directory, not a file inside it.
    #[error("model path is not a directory: {path}")]
    NotADirectory { path: PathBuf },
}
