//! Configuration error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("invalid port number")]
    InvalidPort,

    #[error("invalid request timeout")]
    InvalidTimeout,

    #[error("uploads root directory must be a non-empty path")]
    InvalidUploadsRoot,
}
