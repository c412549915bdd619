//! Management-API client for the storage lifecycle
//!
//! Implements the four broker lifecycle actions as short synchronous call
//! sequences against the resource-manager REST API. There is no internal
//! retry and no compensating cleanup: a failed multi-step operation can leave
//! partial state behind, which the orchestrating platform is expected to
//! resolve by polling and retrying.

use crate::blob::BlobClient;
use crate::error::{ProviderError, Result};
use crate::model::{AccountType, ContainerAccess, InstanceState, LastOperationResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, warn};
use url::Url;

/// API version for resource group operations
const RESOURCES_API_VERSION: &str = "2015-11-01";

/// API version for storage account operations
const STORAGE_API_VERSION: &str = "2015-06-15";

/// Default user agent for management requests
const DEFAULT_USER_AGENT: &str = concat!("storagebroker/", env!("CARGO_PKG_VERSION"));

/// Authenticated client for the provider's management API
pub struct ProviderClient {
    http: reqwest::Client,
    base_url: Url,
    subscription_id: String,
    token: String,
    blob_endpoint_suffix: String,
    blob_endpoint_override: Option<String>,
}

/// Builder for [`ProviderClient`]
#[derive(Default)]
pub struct ProviderClientBuilder {
    base_url: Option<String>,
    subscription_id: Option<String>,
    token: Option<String>,
    user_agent: Option<String>,
    blob_endpoint_suffix: Option<String>,
    blob_endpoint_override: Option<String>,
}

impl ProviderClientBuilder {
    /// Management endpoint base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn subscription_id(mut self, id: impl Into<String>) -> Self {
        self.subscription_id = Some(id.into());
        self
    }

    /// Bearer token for the management endpoint
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// DNS suffix used to build per-account blob endpoints
    pub fn blob_endpoint_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.blob_endpoint_suffix = Some(suffix.into());
        self
    }

    /// Full blob endpoint base URL, replacing the per-account default
    pub fn blob_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.blob_endpoint_override = Some(endpoint.into());
        self
    }

    pub fn build(self) -> Result<ProviderClient> {
        let base_url = Url::parse(self.base_url.as_deref().unwrap_or_default())?;
        let http = reqwest::Client::builder()
            .user_agent(
                self.user_agent
                    .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            )
            .build()
            .map_err(|source| ProviderError::Transport {
                action: "build http client".to_string(),
                source,
            })?;

        Ok(ProviderClient {
            http,
            base_url,
            subscription_id: self.subscription_id.unwrap_or_default(),
            token: self.token.unwrap_or_default(),
            blob_endpoint_suffix: self
                .blob_endpoint_suffix
                .unwrap_or_else(|| "core.windows.net".to_string()),
            blob_endpoint_override: self.blob_endpoint_override,
        })
    }
}

#[derive(Debug, Deserialize)]
struct NameAvailability {
    #[serde(rename = "nameAvailable")]
    name_available: bool,
}

#[derive(Debug, Deserialize)]
struct AccountProperties {
    #[serde(rename = "provisioningState", default)]
    provisioning_state: String,
}

#[derive(Debug, Deserialize)]
struct StorageAccount {
    #[serde(default)]
    properties: Option<AccountProperties>,
}

#[derive(Debug, Deserialize)]
struct AccountKeys {
    #[serde(default)]
    key1: String,
    #[serde(default)]
    key2: String,
}

impl ProviderClient {
    pub fn builder() -> ProviderClientBuilder {
        ProviderClientBuilder::default()
    }

    /// Provision a resource group and a storage account.
    ///
    /// Both creations are accepted asynchronously by the provider; success
    /// here means "accepted, not completed". Poll via
    /// [`get_instance_state`](Self::get_instance_state) for completion. The
    /// first failing step aborts the sequence without cleanup.
    pub async fn create_instance(
        &self,
        resource_group: &str,
        storage_account: &str,
        location: &str,
        account_type: AccountType,
    ) -> Result<()> {
        if let Err(e) = self.create_resource_group(resource_group, location).await {
            warn!("Creating resource group {} failed: {}", resource_group, e);
            return Err(e);
        }

        if let Err(e) = self
            .create_storage_account(resource_group, storage_account, location, account_type)
            .await
        {
            warn!(
                "Creating storage account {}.{} failed: {}",
                resource_group, storage_account, e
            );
            return Err(e);
        }

        Ok(())
    }

    /// Re-derive the instance state from the live storage account.
    ///
    /// A missing account is not an error: it maps to the absorbing `Gone`
    /// state, which is a successful poll outcome.
    pub async fn get_instance_state(
        &self,
        resource_group: &str,
        storage_account: &str,
    ) -> Result<LastOperationResponse> {
        let provisioning_state = match self
            .get_account_provisioning_state(resource_group, storage_account)
            .await
        {
            Ok(state) => state,
            Err(ProviderError::NotFound { .. }) => {
                return Ok(LastOperationResponse {
                    state: InstanceState::Gone,
                    description: "The service instance is gone".to_string(),
                });
            }
            Err(e) => {
                warn!("Getting instance state failed: {}", e);
                return Err(e);
            }
        };

        let response = match provisioning_state.as_str() {
            "Creating" | "ResolvingDNS" => LastOperationResponse {
                state: InstanceState::InProgress,
                description: format!(
                    "Creating the service instance, state: {}",
                    provisioning_state
                ),
            },
            "Succeeded" => LastOperationResponse {
                state: InstanceState::Succeeded,
                description: format!(
                    "Successfully created the service instance, state: {}",
                    provisioning_state
                ),
            },
            _ => LastOperationResponse {
                state: InstanceState::Failed,
                description: format!(
                    "Failed to create the service instance, state: {}",
                    provisioning_state
                ),
            },
        };
        Ok(response)
    }

    /// List the account's access keys and make sure the named container
    /// exists, returning both keys
    pub async fn get_access_keys(
        &self,
        resource_group: &str,
        storage_account: &str,
        container: &str,
        access: ContainerAccess,
    ) -> Result<(String, String)> {
        let keys = self.list_keys(resource_group, storage_account).await?;

        let endpoint = match &self.blob_endpoint_override {
            Some(endpoint) => endpoint.clone(),
            None => format!(
                "https://{}.blob.{}",
                storage_account, self.blob_endpoint_suffix
            ),
        };
        let blob = BlobClient::new(
            self.http.clone(),
            storage_account,
            &keys.key1,
            endpoint,
        )?;
        blob.create_container_if_not_exists(container, access)
            .await?;

        Ok((keys.key1, keys.key2))
    }

    /// Delete the storage account. The resource group is deliberately left
    /// behind; the original broker never deleted it either.
    pub async fn delete_instance(
        &self,
        resource_group: &str,
        storage_account: &str,
    ) -> Result<()> {
        let action = format!("delete storage account '{}'", storage_account);
        let url = self.storage_account_url(resource_group, storage_account)?;

        let response = self
            .http
            .delete(url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|source| ProviderError::Transport {
                action: action.clone(),
                source,
            })?;

        let status = response.status();
        if !matches!(status.as_u16(), 200 | 202 | 204) {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                action,
                status: status.as_u16(),
                body,
            });
        }

        info!(
            "Deleting of {}.{} succeeded",
            resource_group, storage_account
        );
        Ok(())
    }

    /// Rotate both access keys, `key1` first. A failure on `key1` leaves
    /// `key2` untouched.
    pub async fn regenerate_access_keys(
        &self,
        resource_group: &str,
        storage_account: &str,
    ) -> Result<()> {
        for key_name in ["key1", "key2"] {
            self.regenerate_key(resource_group, storage_account, key_name)
                .await?;
        }
        Ok(())
    }

    async fn create_resource_group(&self, resource_group: &str, location: &str) -> Result<()> {
        let action = format!("create resource group '{}'", resource_group);
        let mut url = self.base_url.join(&format!(
            "subscriptions/{}/resourcegroups/{}",
            self.subscription_id, resource_group
        ))?;
        url.set_query(Some(&format!("api-version={}", RESOURCES_API_VERSION)));

        let response = self
            .http
            .put(url)
            .bearer_auth(&self.token)
            .json(&json!({ "location": location }))
            .send()
            .await
            .map_err(|source| ProviderError::Transport {
                action: action.clone(),
                source,
            })?;

        // Fire-and-forget: 202 means the group is still being provisioned
        let status = response.status();
        if !matches!(status.as_u16(), 200 | 201 | 202) {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                action,
                status: status.as_u16(),
                body,
            });
        }

        info!("Creation initiated {}", resource_group);
        Ok(())
    }

    async fn create_storage_account(
        &self,
        resource_group: &str,
        storage_account: &str,
        location: &str,
        account_type: AccountType,
    ) -> Result<()> {
        self.check_name_availability(storage_account).await?;

        let action = format!("create storage account '{}'", storage_account);
        let url = self.storage_account_url(resource_group, storage_account)?;

        let response = self
            .http
            .put(url)
            .bearer_auth(&self.token)
            .json(&json!({
                "location": location,
                "properties": { "accountType": account_type.as_str() },
            }))
            .send()
            .await
            .map_err(|source| ProviderError::Transport {
                action: action.clone(),
                source,
            })?;

        let status = response.status();
        if !matches!(status.as_u16(), 200 | 202) {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                action,
                status: status.as_u16(),
                body,
            });
        }

        info!("Creation initiated {}.{}", resource_group, storage_account);
        Ok(())
    }

    async fn check_name_availability(&self, storage_account: &str) -> Result<()> {
        let action = format!("check name availability for '{}'", storage_account);
        let mut url = self.base_url.join(&format!(
            "subscriptions/{}/providers/Microsoft.Storage/checkNameAvailability",
            self.subscription_id
        ))?;
        url.set_query(Some(&format!("api-version={}", STORAGE_API_VERSION)));

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .json(&json!({
                "name": storage_account,
                "type": "Microsoft.Storage/storageAccounts",
            }))
            .send()
            .await
            .map_err(|source| ProviderError::Transport {
                action: action.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                action,
                status: status.as_u16(),
                body,
            });
        }

        let availability: NameAvailability =
            response
                .json()
                .await
                .map_err(|source| ProviderError::Decode { action, source })?;

        if !availability.name_available {
            return Err(ProviderError::AccountNameUnavailable {
                account: storage_account.to_string(),
            });
        }

        debug!("Storage account name {} is available", storage_account);
        Ok(())
    }

    async fn get_account_provisioning_state(
        &self,
        resource_group: &str,
        storage_account: &str,
    ) -> Result<String> {
        let action = format!("get properties of '{}'", storage_account);
        let url = self.storage_account_url(resource_group, storage_account)?;

        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|source| ProviderError::Transport {
                action: action.clone(),
                source,
            })?;

        let status = response.status();
        if status.as_u16() == 404 {
            return Err(ProviderError::NotFound {
                account: storage_account.to_string(),
            });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                action,
                status: status.as_u16(),
                body,
            });
        }

        let account: StorageAccount =
            response
                .json()
                .await
                .map_err(|source| ProviderError::Decode { action, source })?;

        Ok(account
            .properties
            .map(|p| p.provisioning_state)
            .unwrap_or_default())
    }

    async fn list_keys(
        &self,
        resource_group: &str,
        storage_account: &str,
    ) -> Result<AccountKeys> {
        let action = format!("list keys of '{}'", storage_account);
        let url = self.storage_account_action_url(resource_group, storage_account, "/listKeys")?;

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|source| ProviderError::Transport {
                action: action.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                action,
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|source| ProviderError::Decode { action, source })
    }

    async fn regenerate_key(
        &self,
        resource_group: &str,
        storage_account: &str,
        key_name: &str,
    ) -> Result<()> {
        let action = format!(
            "regenerate key '{}' of '{}'",
            key_name, storage_account
        );
        let url =
            self.storage_account_action_url(resource_group, storage_account, "/regenerateKey")?;

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .json(&json!({ "keyName": key_name }))
            .send()
            .await
            .map_err(|source| ProviderError::Transport {
                action: action.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                action,
                status: status.as_u16(),
                body,
            });
        }

        debug!("Regenerated {} of {}", key_name, storage_account);
        Ok(())
    }

    fn storage_account_url(&self, resource_group: &str, storage_account: &str) -> Result<Url> {
        self.storage_account_action_url(resource_group, storage_account, "")
    }

    fn storage_account_action_url(
        &self,
        resource_group: &str,
        storage_account: &str,
        action_suffix: &str,
    ) -> Result<Url> {
        let mut url = self.base_url.join(&format!(
            "subscriptions/{}/resourceGroups/{}/providers/Microsoft.Storage/storageAccounts/{}{}",
            self.subscription_id, resource_group, storage_account, action_suffix
        ))?;
        url.set_query(Some(&format!("api-version={}", STORAGE_API_VERSION)));
        Ok(url)
    }
}
