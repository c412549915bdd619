//! Request dispatch: one operation name, one provider call, one output line
//!
//! The request is an explicit value built once per invocation and threaded
//! through; there is no process-wide operation state. Provision's success
//! return means "accepted, not completed": the provider finishes creating
//! the account asynchronously and Poll is the only completion signal.

use crate::catalog;
use crate::error::{BrokerError, Result};
use std::path::Path;
use storagebroker_core::{
    CloudEnvironment, ContainerAccess, Credentials, ProviderClient, ProviderConfig,
    ServiceInstance, auth, naming,
};
use tracing::{debug, info};

/// Access level for containers created by Bind: public read for blobs only
const CONTAINER_ACCESS: ContainerAccess = ContainerAccess::Blob;

/// A single broker invocation
#[derive(Debug, Clone)]
pub struct Request {
    pub environment: String,
    pub operation: String,
    pub parameters: String,
}

/// The recognized lifecycle operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Catalog,
    Provision,
    Deprovision,
    Poll,
    Bind,
    Unbind,
}

impl Operation {
    /// Parse an operation name; `None` for anything unrecognized
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "Catalog" => Some(Operation::Catalog),
            "Provision" => Some(Operation::Provision),
            "Deprovision" => Some(Operation::Deprovision),
            "Poll" => Some(Operation::Poll),
            "Bind" => Some(Operation::Bind),
            "Unbind" => Some(Operation::Unbind),
            _ => None,
        }
    }
}

/// Execute one request end to end.
///
/// Catalog never touches credentials, and an unrecognized operation is a
/// silent no-op: the adapter exits successfully having done nothing.
pub async fn execute(request: &Request, config_file: Option<&Path>) -> Result<()> {
    let operation = match Operation::parse(&request.operation) {
        Some(operation) => operation,
        None => {
            debug!("Ignoring unrecognized operation '{}'", request.operation);
            return Ok(());
        }
    };

    if operation == Operation::Catalog {
        return catalog::print_catalog();
    }

    let environment = CloudEnvironment::resolve(&request.environment)?;
    let config = ProviderConfig::load(config_file)?;
    let instance = decode_instance(&request.parameters)?;

    let resource_group = naming::resource_group_name(&instance.id);
    let storage_account = naming::storage_account_name(&instance.id);

    let http = reqwest::Client::new();
    let token = auth::acquire_token(&http, &environment, &config).await?;

    let mut builder = ProviderClient::builder()
        .base_url(&environment.resource_manager_endpoint)
        .subscription_id(&config.subscription_id)
        .token(token)
        .blob_endpoint_suffix(&environment.blob_endpoint_suffix);
    if let Some(endpoint) = &environment.blob_endpoint_override {
        builder = builder.blob_endpoint(endpoint);
    }
    let client = builder.build()?;

    match operation {
        Operation::Catalog => unreachable!("handled before client construction"),
        Operation::Provision => {
            client
                .create_instance(
                    &resource_group,
                    &storage_account,
                    &config.location,
                    config.account_type,
                )
                .await?;
            info!(
                "Provisioning accepted for {}.{}",
                resource_group, storage_account
            );
        }
        Operation::Deprovision => {
            client
                .delete_instance(&resource_group, &storage_account)
                .await?;
        }
        Operation::Poll => {
            let response = client
                .get_instance_state(&resource_group, &storage_account)
                .await?;
            println!("{}", serde_json::to_string(&response)?);
        }
        Operation::Bind => {
            let container = naming::container_name(&instance.id);
            let (primary, secondary) = client
                .get_access_keys(&resource_group, &storage_account, &container, CONTAINER_ACCESS)
                .await?;
            let credentials = Credentials {
                storage_account_name: storage_account,
                container_name: container,
                primary_access_key: primary,
                secondary_access_key: secondary,
            };
            println!("{}", serde_json::to_string(&credentials)?);
        }
        Operation::Unbind => {
            client
                .regenerate_access_keys(&resource_group, &storage_account)
                .await?;
        }
    }

    Ok(())
}

/// Decode the parameter blob and insist on a usable instance id.
///
/// A malformed document or an empty id aborts before any resource name is
/// derived; silently provisioning against a bare name prefix helps nobody.
fn decode_instance(parameters: &str) -> Result<ServiceInstance> {
    let instance: ServiceInstance = serde_json::from_str(parameters)
        .map_err(|e| BrokerError::InvalidParameters(e.to_string()))?;
    if instance.id.is_empty() {
        return Err(BrokerError::InvalidParameters(
            "missing service instance id".to_string(),
        ));
    }
    Ok(instance)
}
