//! Provider credentials and broker settings
//!
//! Resolution follows the usual "explicit wins" ladder: a complete set of
//! `AZURE_*` environment variables is used as-is; otherwise the TOML config
//! file is loaded (explicit path, `STORAGEBROKER_CONFIG`, or the platform
//! config directory) and partial environment overrides are applied on top.

use super::error::{ConfigError, Result};
use crate::model::AccountType;
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming the config file
pub const CONFIG_FILE_VAR: &str = "STORAGEBROKER_CONFIG";

const SUBSCRIPTION_ID_VAR: &str = "AZURE_SUBSCRIPTION_ID";
const TENANT_ID_VAR: &str = "AZURE_TENANT_ID";
const CLIENT_ID_VAR: &str = "AZURE_CLIENT_ID";
const CLIENT_SECRET_VAR: &str = "AZURE_CLIENT_SECRET";
const LOCATION_VAR: &str = "AZURE_LOCATION";
const ACCOUNT_TYPE_VAR: &str = "AZURE_ACCOUNT_TYPE";

/// Default region new instances are provisioned in
pub const DEFAULT_LOCATION: &str = "eastus";

/// Fully resolved broker configuration
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub subscription_id: String,
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
    pub location: String,
    pub account_type: AccountType,
}

/// On-disk shape of the config file; every field optional so environment
/// variables can fill the gaps
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    subscription_id: Option<String>,
    tenant_id: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
    location: Option<String>,
    account_type: Option<String>,
}

impl ProviderConfig {
    /// Load configuration, preferring environment variables over the config
    /// file at `explicit_path` (or the default locations)
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let env_subscription = env::var(SUBSCRIPTION_ID_VAR).ok();
        let env_tenant = env::var(TENANT_ID_VAR).ok();
        let env_client = env::var(CLIENT_ID_VAR).ok();
        let env_secret = env::var(CLIENT_SECRET_VAR).ok();

        let complete_env = env_subscription.is_some()
            && env_tenant.is_some()
            && env_client.is_some()
            && env_secret.is_some();

        let file = if complete_env {
            info!("Using provider credentials from environment variables");
            FileConfig::default()
        } else {
            match Self::config_path(explicit_path) {
                Some(path) if path.exists() => {
                    debug!("Loading config from {:?}", path);
                    let contents =
                        std::fs::read_to_string(&path).map_err(|source| ConfigError::LoadError {
                            path: path.display().to_string(),
                            source,
                        })?;
                    toml::from_str(&contents)?
                }
                _ => {
                    debug!("No config file found, relying on environment variables");
                    FileConfig::default()
                }
            }
        };

        let subscription_id = env_subscription.or(file.subscription_id);
        let tenant_id = env_tenant.or(file.tenant_id);
        let client_id = env_client.or(file.client_id);
        let client_secret = env_secret.or(file.client_secret);

        let mut missing = Vec::new();
        if subscription_id.is_none() {
            missing.push("subscription_id");
        }
        if tenant_id.is_none() {
            missing.push("tenant_id");
        }
        if client_id.is_none() {
            missing.push("client_id");
        }
        if client_secret.is_none() {
            missing.push("client_secret");
        }
        if !missing.is_empty() {
            return Err(ConfigError::IncompleteCredentials {
                fields: missing.join(", "),
            });
        }

        let location = env::var(LOCATION_VAR)
            .ok()
            .or(file.location)
            .unwrap_or_else(|| DEFAULT_LOCATION.to_string());

        let account_type = match env::var(ACCOUNT_TYPE_VAR).ok().or(file.account_type) {
            Some(raw) => raw
                .parse::<AccountType>()
                .map_err(|message| ConfigError::InvalidValue {
                    field: "account_type".to_string(),
                    message,
                })?,
            None => AccountType::StandardLrs,
        };

        Ok(Self {
            subscription_id: subscription_id.unwrap_or_default(),
            tenant_id: tenant_id.unwrap_or_default(),
            client_id: client_id.unwrap_or_default(),
            client_secret: client_secret.unwrap_or_default(),
            location,
            account_type,
        })
    }

    /// Resolve the config file path: explicit argument, `STORAGEBROKER_CONFIG`,
    /// then the platform config directory
    fn config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit_path {
            return Some(path.to_path_buf());
        }
        if let Ok(path) = env::var(CONFIG_FILE_VAR) {
            return Some(PathBuf::from(path));
        }
        directories::ProjectDirs::from("", "", "storagebroker")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serial_test::serial;
    use std::io::Write;

    fn clear_env() {
        for var in [
            SUBSCRIPTION_ID_VAR,
            TENANT_ID_VAR,
            CLIENT_ID_VAR,
            CLIENT_SECRET_VAR,
            LOCATION_VAR,
            ACCOUNT_TYPE_VAR,
            CONFIG_FILE_VAR,
        ] {
            unsafe {
                env::remove_var(var);
            }
        }
    }

    #[test]
    #[serial]
    fn complete_environment_wins() {
        clear_env();
        unsafe {
            env::set_var(SUBSCRIPTION_ID_VAR, "sub");
            env::set_var(TENANT_ID_VAR, "tenant");
            env::set_var(CLIENT_ID_VAR, "client");
            env::set_var(CLIENT_SECRET_VAR, "secret");
        }

        let config = ProviderConfig::load(None).unwrap();
        assert_eq!(config.subscription_id, "sub");
        assert_eq!(config.location, DEFAULT_LOCATION);
        assert_eq!(config.account_type, AccountType::StandardLrs);
        clear_env();
    }

    #[test]
    #[serial]
    fn file_fills_in_missing_fields() {
        clear_env();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "subscription_id = \"file-sub\"\n\
             tenant_id = \"file-tenant\"\n\
             client_id = \"file-client\"\n\
             client_secret = \"file-secret\"\n\
             location = \"westus\"\n\
             account_type = \"Standard_GRS\""
        )
        .unwrap();

        let config = ProviderConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.subscription_id, "file-sub");
        assert_eq!(config.location, "westus");
        assert_eq!(config.account_type, AccountType::StandardGrs);
        clear_env();
    }

    #[test]
    #[serial]
    fn partial_environment_overrides_file() {
        clear_env();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "subscription_id = \"file-sub\"\n\
             tenant_id = \"file-tenant\"\n\
             client_id = \"file-client\"\n\
             client_secret = \"file-secret\""
        )
        .unwrap();
        unsafe {
            env::set_var(SUBSCRIPTION_ID_VAR, "env-sub");
        }

        let config = ProviderConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.subscription_id, "env-sub");
        assert_eq!(config.tenant_id, "file-tenant");
        clear_env();
    }

    #[test]
    #[serial]
    fn incomplete_credentials_are_fatal() {
        clear_env();
        unsafe {
            env::set_var(SUBSCRIPTION_ID_VAR, "sub");
            // point at a nonexistent config file so the developer's real one
            // cannot leak into the test
            env::set_var(CONFIG_FILE_VAR, "/nonexistent/storagebroker.toml");
        }
        let err = ProviderConfig::load(None).unwrap_err();
        match err {
            ConfigError::IncompleteCredentials { fields } => {
                assert!(fields.contains("tenant_id"));
                assert!(fields.contains("client_secret"));
            }
            other => panic!("unexpected error: {other}"),
        }
        clear_env();
    }

    #[test]
    #[serial]
    fn invalid_account_type_is_rejected() {
        clear_env();
        unsafe {
            env::set_var(SUBSCRIPTION_ID_VAR, "sub");
            env::set_var(TENANT_ID_VAR, "tenant");
            env::set_var(CLIENT_ID_VAR, "client");
            env::set_var(CLIENT_SECRET_VAR, "secret");
            env::set_var(ACCOUNT_TYPE_VAR, "Basic_LRS");
        }
        let err = ProviderConfig::load(None).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        clear_env();
    }
}
