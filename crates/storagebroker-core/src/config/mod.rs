//! Configuration: provider credentials, cloud environments, defaults

mod environment;
mod error;
mod settings;

pub use environment::{
    ACTIVE_DIRECTORY_ENDPOINT_VAR, BLOB_ENDPOINT_VAR, CloudEnvironment,
    RESOURCE_MANAGER_ENDPOINT_VAR,
};
pub use error::{ConfigError, Result};
pub use settings::{CONFIG_FILE_VAR, DEFAULT_LOCATION, ProviderConfig};
