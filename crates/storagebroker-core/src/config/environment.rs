//! Cloud environment endpoint tables
//!
//! The `<environment>` CLI argument selects one of the sovereign cloud
//! environments. Each carries the management endpoint the client talks to, the
//! login endpoint tokens are issued from, and the suffix blob URLs are built
//! with. Endpoints can be overridden through environment variables, which is
//! how the test suite points the client at a mock server.

use super::error::{ConfigError, Result};
use std::env;

/// Environment variable overriding the resource manager endpoint
pub const RESOURCE_MANAGER_ENDPOINT_VAR: &str = "AZURE_RESOURCE_MANAGER_ENDPOINT";

/// Environment variable overriding the active directory (login) endpoint
pub const ACTIVE_DIRECTORY_ENDPOINT_VAR: &str = "AZURE_ACTIVE_DIRECTORY_ENDPOINT";

/// Environment variable overriding the blob endpoint (full base URL)
pub const BLOB_ENDPOINT_VAR: &str = "STORAGEBROKER_BLOB_ENDPOINT";

/// A resolved cloud environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudEnvironment {
    pub name: &'static str,
    pub resource_manager_endpoint: String,
    pub active_directory_endpoint: String,
    pub blob_endpoint_suffix: String,
    /// Full blob base URL override; when set, the account name is not used to
    /// build the blob URL
    pub blob_endpoint_override: Option<String>,
}

impl CloudEnvironment {
    /// Resolve an environment by name, applying endpoint overrides from the
    /// process environment
    pub fn resolve(name: &str) -> Result<Self> {
        let (canonical, rm, ad, suffix) = match name {
            "AzureCloud" | "AzurePublicCloud" => (
                "AzureCloud",
                "https://management.azure.com",
                "https://login.microsoftonline.com",
                "core.windows.net",
            ),
            "AzureChinaCloud" => (
                "AzureChinaCloud",
                "https://management.chinacloudapi.cn",
                "https://login.chinacloudapi.cn",
                "core.chinacloudapi.cn",
            ),
            "AzureUSGovernmentCloud" => (
                "AzureUSGovernmentCloud",
                "https://management.usgovcloudapi.net",
                "https://login.microsoftonline.us",
                "core.usgovcloudapi.net",
            ),
            "AzureGermanCloud" => (
                "AzureGermanCloud",
                "https://management.microsoftazure.de",
                "https://login.microsoftonline.de",
                "core.cloudapi.de",
            ),
            other => {
                return Err(ConfigError::UnknownEnvironment {
                    name: other.to_string(),
                });
            }
        };

        Ok(Self {
            name: canonical,
            resource_manager_endpoint: env::var(RESOURCE_MANAGER_ENDPOINT_VAR)
                .unwrap_or_else(|_| rm.to_string()),
            active_directory_endpoint: env::var(ACTIVE_DIRECTORY_ENDPOINT_VAR)
                .unwrap_or_else(|_| ad.to_string()),
            blob_endpoint_suffix: suffix.to_string(),
            blob_endpoint_override: env::var(BLOB_ENDPOINT_VAR).ok(),
        })
    }
}
