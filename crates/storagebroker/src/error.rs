//! Error types for the broker CLI

use storagebroker_core::{ConfigError, ProviderError};
use thiserror::Error;

/// Main error type for the storagebroker binary
#[derive(Error, Debug)]
pub enum BrokerError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Catalog error for '{path}': {message}")]
    Catalog { path: String, message: String },

    #[error("Output formatting error: {0}")]
    Output(#[from] serde_json::Error),
}

/// Result type for broker operations
pub type Result<T> = std::result::Result<T, BrokerError>;
