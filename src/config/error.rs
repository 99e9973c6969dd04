//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid bind address: {0}")]
    InvalidBindAddress(String),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Consistency threshold must be in (0, 1], got {0}")]
    InvalidConsistencyThreshold(f64),

    #[error("Debounce window exceeds {max_ms} ms: {actual_ms} ms")]
    DebounceTooLong { max_ms: u64, actual_ms: u64 },

    #[error("Score decimals exceed {max}: {actual}")]
    TooManyScoreDecimals { max: usize, actual: usize },
}
