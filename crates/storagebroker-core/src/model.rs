//! Wire models shared by the dispatcher and the provider client

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A service instance as decoded from the broker's parameter blob.
///
/// Every field is defaulted so that sparse parameter documents still decode;
/// only `id` is used downstream, the rest is carried for completeness.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceInstance {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub organization_guid: String,
    #[serde(default)]
    pub plan_id: String,
    #[serde(default)]
    pub service_id: String,
    #[serde(default)]
    pub space_guid: String,
    #[serde(default)]
    pub parameters: Option<serde_json::Value>,
}

/// Credentials returned by the Bind operation. Not persisted by this process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub storage_account_name: String,
    pub container_name: String,
    pub primary_access_key: String,
    pub secondary_access_key: String,
}

/// Instance state as observed through polling.
///
/// `Gone` is an absorbing state reached once the storage account no longer
/// exists; the other three mirror the provider's provisioning lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstanceState {
    #[serde(rename = "in progress")]
    InProgress,
    #[serde(rename = "succeeded")]
    Succeeded,
    #[serde(rename = "failed")]
    Failed,
    #[serde(rename = "Gone")]
    Gone,
}

impl fmt::Display for InstanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InstanceState::InProgress => "in progress",
            InstanceState::Succeeded => "succeeded",
            InstanceState::Failed => "failed",
            InstanceState::Gone => "Gone",
        };
        f.write_str(s)
    }
}

/// Response emitted by the Poll operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastOperationResponse {
    pub state: InstanceState,
    pub description: String,
}

/// Storage account replication tier, serialized in the provider's wire form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountType {
    #[serde(rename = "Standard_LRS")]
    StandardLrs,
    #[serde(rename = "Standard_ZRS")]
    StandardZrs,
    #[serde(rename = "Standard_GRS")]
    StandardGrs,
    #[serde(rename = "Standard_RAGRS")]
    StandardRagrs,
    #[serde(rename = "Premium_LRS")]
    PremiumLrs,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::StandardLrs => "Standard_LRS",
            AccountType::StandardZrs => "Standard_ZRS",
            AccountType::StandardGrs => "Standard_GRS",
            AccountType::StandardRagrs => "Standard_RAGRS",
            AccountType::PremiumLrs => "Premium_LRS",
        }
    }
}

impl FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Standard_LRS" => Ok(AccountType::StandardLrs),
            "Standard_ZRS" => Ok(AccountType::StandardZrs),
            "Standard_GRS" => Ok(AccountType::StandardGrs),
            "Standard_RAGRS" => Ok(AccountType::StandardRagrs),
            "Premium_LRS" => Ok(AccountType::PremiumLrs),
            other => Err(format!("unknown storage account type '{}'", other)),
        }
    }
}

/// Blob container access level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerAccess {
    /// No anonymous access
    Private,
    /// Public read access for blobs only
    Blob,
    /// Public read and list access for the whole container
    Container,
}

impl ContainerAccess {
    /// Value for the `x-ms-blob-public-access` header, `None` for private
    pub fn header_value(&self) -> Option<&'static str> {
        match self {
            ContainerAccess::Private => None,
            ContainerAccess::Blob => Some("blob"),
            ContainerAccess::Container => Some("container"),
        }
    }
}
