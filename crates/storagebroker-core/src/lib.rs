//! Core library for the storage service broker CLI
//!
//! Provides the provider configuration and credential loading, the
//! management-API client implementing the broker lifecycle actions, the blob
//! data-plane client, deterministic instance naming, and the wire models the
//! dispatcher serializes.

pub mod auth;
pub mod blob;
pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod naming;

pub use client::{ProviderClient, ProviderClientBuilder};
pub use config::{CloudEnvironment, ConfigError, ProviderConfig};
pub use error::ProviderError;
pub use model::{
    AccountType, ContainerAccess, Credentials, InstanceState, LastOperationResponse,
    ServiceInstance,
};
