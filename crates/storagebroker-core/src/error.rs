//! Error types for provider API operations

use thiserror::Error;

/// Errors that can occur while talking to the provider's management or blob APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("{action} failed: {source}")]
    Transport {
        action: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{action} failed with status {status}: {body}")]
    Api {
        action: String,
        status: u16,
        body: String,
    },

    #[error("storage account '{account}' not found")]
    NotFound { account: String },

    #[error("{account} is unavailable")]
    AccountNameUnavailable { account: String },

    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("unexpected response body for {action}: {source}")]
    Decode {
        action: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("storage account key is not valid base64: {0}")]
    InvalidAccessKey(#[from] base64::DecodeError),

    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
}

/// Result type for provider operations
pub type Result<T> = std::result::Result<T, ProviderError>;
