//! CLI structure for the storage service broker adapter
//!
//! The broker protocol drives this binary with three positional arguments and
//! inspects stdout, so the surface is deliberately small: one invocation, one
//! operation, at most one line of output.

use clap::Parser;

/// Service broker adapter for blob storage instances
#[derive(Parser, Debug)]
#[command(name = "storagebroker")]
#[command(
    version,
    about = "Service broker adapter managing blob storage instances"
)]
#[command(long_about = "
Service broker adapter managing blob storage instances

Translates one broker lifecycle operation per invocation into provider API
calls. Poll and Bind print a single JSON line on stdout; Catalog prints the
static catalog document; the remaining operations print nothing on success.

EXAMPLES:
    storagebroker AzureCloud Catalog '{}'
    storagebroker AzureCloud Provision '{\"id\":\"abcd1234-ef56-7890-ab12-cd34ef567890\"}'
    storagebroker AzureCloud Poll '{\"id\":\"abcd1234-ef56-7890-ab12-cd34ef567890\"}'
")]
pub struct Cli {
    /// Cloud environment to target (AzureCloud, AzureChinaCloud,
    /// AzureUSGovernmentCloud, AzureGermanCloud)
    pub environment: String,

    /// Lifecycle operation (Catalog, Provision, Poll, Bind, Unbind,
    /// Deprovision)
    pub operation: String,

    /// JSON parameter document describing the service instance
    pub parameters: String,

    /// Path to alternate configuration file
    #[arg(long, env = "STORAGEBROKER_CONFIG_FILE")]
    pub config_file: Option<String>,

    /// Enable verbose logging
    #[arg(long, short, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
