use clap::Parser;
use clap::error::ErrorKind;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod catalog;
mod cli;
mod dispatch;
mod error;

use cli::Cli;
use dispatch::Request;

#[tokio::main]
async fn main() {
    // The broker contract forbids any output on argument errors, so clap's
    // usage text is suppressed. Help and version remain reachable.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                print!("{e}");
                std::process::exit(0);
            }
            _ => std::process::exit(1),
        },
    };

    if cli.operation.is_empty() {
        std::process::exit(1);
    }

    init_tracing(cli.verbose);

    let request = Request {
        environment: cli.environment,
        operation: cli.operation,
        parameters: cli.parameters,
    };
    let config_file = cli.config_file.map(PathBuf::from);

    if let Err(e) = dispatch::execute(&request, config_file.as_deref()).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    // Check for RUST_LOG env var first, then fall back to verbosity flag
    let filter = if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::EnvFilter::from_default_env()
    } else {
        let level = match verbose {
            0 => "storagebroker=warn,storagebroker_core=warn",
            1 => "storagebroker=info,storagebroker_core=info",
            2 => "storagebroker=debug,storagebroker_core=debug",
            _ => "storagebroker=trace,storagebroker_core=trace",
        };
        tracing_subscriber::EnvFilter::new(level)
    };

    // Logs go to stderr; stdout carries at most one contractual output line
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    debug!("Tracing initialized with verbosity level: {}", verbose);
}
