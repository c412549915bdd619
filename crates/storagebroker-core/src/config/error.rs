//! Error types for configuration and credential loading

use thiserror::Error;

/// Errors that can occur while loading broker configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config from {path}: {source}")]
    LoadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing credential field(s): {fields}. Set the AZURE_* environment variables or add them to the config file.")]
    IncompleteCredentials { fields: String },

    #[error("Unknown cloud environment '{name}'")]
    UnknownEnvironment { name: String },

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Failed to determine config directory")]
    ConfigDirError,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
