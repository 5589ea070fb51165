//! Runner error types.

use rf24_protocol::Rf24Error;
use thiserror::Error;

/// Errors that can occur while running a sequence.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("bridge error: {0}")]
    Bridge(#[from] Rf24Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type alias for runner operations.
pub type RunnerResult<T> = Result<T, RunnerError>;
