//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `SEMDEDUP_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    DEFAULT_EMBED_TIMEOUT_SECS, DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_ORACLE_MODEL,
    DEFAULT_ORACLE_TIMEOUT_SECS, DEFAULT_QUESTION_FIELD, DEFAULT_TOP_K,
};
use crate::engine::MatchSettings;

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `SEMDEDUP_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Directory holding the sentence-embedding model (`config.json`,
    /// `model.safetensors`, `tokenizer.json`). `None` runs the stub embedder.
    pub model_path: Option<PathBuf>,

    /// Model name handed to the oracle client. Default: `gemini-1.5-flash`.
    pub oracle_model: String,

    /// Shortlist size for single-question matching. Default: `5`.
    pub shortlist_k: usize,

    /// Pool record field holding the question text. Default: `Question`.
    pub question_field: String,

    /// Host substrings a `questions_url` must match. Empty allows every host.
    pub allowed_domains: Vec<String>,

    /// Timeout for fetching a question pool.
    pub fetch_timeout: Duration,

    /// Timeout for one embedding call.
    pub embed_timeout: Duration,

    /// Timeout for one oracle call.
    pub oracle_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            model_path: None,
            oracle_model: DEFAULT_ORACLE_MODEL.to_string(),
            shortlist_k: DEFAULT_TOP_K,
            question_field: DEFAULT_QUESTION_FIELD.to_string(),
            allowed_domains: Vec::new(),
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            embed_timeout: Duration::from_secs(DEFAULT_EMBED_TIMEOUT_SECS),
            oracle_timeout: Duration::from_secs(DEFAULT_ORACLE_TIMEOUT_SECS),
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "SEMDEDUP_PORT";
    const ENV_BIND_ADDR: &'static str = "SEMDEDUP_BIND_ADDR";
    const ENV_MODEL_PATH: &'static str = "SEMDEDUP_MODEL_PATH";
    const ENV_ORACLE_MODEL: &'static str = "SEMDEDUP_ORACLE_MODEL";
    const ENV_SHORTLIST_K: &'static str = "SEMDEDUP_SHORTLIST_K";
    const ENV_QUESTION_FIELD: &'static str = "SEMDEDUP_QUESTION_FIELD";
    const ENV_ALLOWED_DOMAINS: &'static str = "SEMDEDUP_ALLOWED_DOMAINS";
    const ENV_FETCH_TIMEOUT: &'static str = "SEMDEDUP_FETCH_TIMEOUT_SECS";
    const ENV_EMBED_TIMEOUT: &'static str = "SEMDEDUP_EMBED_TIMEOUT_SECS";
    const ENV_ORACLE_TIMEOUT: &'static str = "SEMDEDUP_ORACLE_TIMEOUT_SECS";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let model_path = Self::parse_optional_path_from_env(Self::ENV_MODEL_PATH);
        let oracle_model =
            Self::parse_string_from_env(Self::ENV_ORACLE_MODEL, defaults.oracle_model);
        let shortlist_k =
            Self::parse_positive_from_env(Self::ENV_SHORTLIST_K, defaults.shortlist_k as u64)?
                as usize;
        let question_field =
            Self::parse_string_from_env(Self::ENV_QUESTION_FIELD, defaults.question_field);
        let allowed_domains = Self::parse_list_from_env(Self::ENV_ALLOWED_DOMAINS);
        let fetch_timeout = Self::parse_secs_from_env(Self::ENV_FETCH_TIMEOUT, defaults.fetch_timeout)?;
        let embed_timeout = Self::parse_secs_from_env(Self::ENV_EMBED_TIMEOUT, defaults.embed_timeout)?;
        let oracle_timeout =
            Self::parse_secs_from_env(Self::ENV_ORACLE_TIMEOUT, defaults.oracle_timeout)?;

        Ok(Self {
            port,
            bind_addr,
            model_path,
            oracle_model,
            shortlist_k,
            question_field,
            allowed_domains,
            fetch_timeout,
            embed_timeout,
            oracle_timeout,
        })
    }

    /// Validates paths and basic invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref path) = self.model_path {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_dir() {
                return Err(ConfigError::NotADirectory { path: path.clone() });
            }
        }

        if self.shortlist_k == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_SHORTLIST_K,
                value: "0".to_string(),
            });
        }

        if self.oracle_model.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_ORACLE_MODEL,
                value: self.oracle_model.clone(),
            });
        }

        if self.question_field.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_QUESTION_FIELD,
                value: self.question_field.clone(),
            });
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    /// Engine tunables derived from this config.
    pub fn match_settings(&self) -> MatchSettings {
        MatchSettings {
            shortlist_k: self.shortlist_k,
            question_field: self.question_field.clone(),
            embed_timeout: self.embed_timeout,
            oracle_timeout: self.oracle_timeout,
        }
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(default)
    }

    fn parse_list_from_env(var_name: &str) -> Vec<String> {
        env::var(var_name)
            .map(|v| {
                v.split(',')
                    .map(|d| d.trim().to_string())
                    .filter(|d| !d.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn parse_positive_from_env(var_name: &'static str, default: u64) -> Result<u64, ConfigError> {
        match env::var(var_name) {
            Ok(value) => match value.trim().parse::<u64>() {
                Ok(n) if n > 0 => Ok(n),
                _ => Err(ConfigError::InvalidValue {
                    name: var_name,
                    value,
                }),
            },
            Err(_) => Ok(default),
        }
    }

    fn parse_secs_from_env(var_name: &'static str, default: Duration) -> Result<Duration, ConfigError> {
        Self::parse_positive_from_env(var_name, default.as_secs()).map(Duration::from_secs)
    }
}
