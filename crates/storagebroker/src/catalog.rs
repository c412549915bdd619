//! Static catalog passthrough
//!
//! The catalog is an opaque JSON document maintained next to the binary; it
//! is printed verbatim without decoding so operators can edit it freely.

use crate::error::{BrokerError, Result};
use std::env;
use std::path::PathBuf;
use tracing::debug;

/// Environment variable overriding the catalog file location
pub const CATALOG_FILE_VAR: &str = "STORAGEBROKER_CATALOG";

const CATALOG_FILE_NAME: &str = "catalog.json";

/// Print the catalog document to stdout, unmodified
pub fn print_catalog() -> Result<()> {
    let path = resolve_catalog_path();
    debug!("Reading catalog from {:?}", path);

    let contents = std::fs::read_to_string(&path).map_err(|e| BrokerError::Catalog {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    print!("{contents}");
    if !contents.ends_with('\n') {
        println!();
    }
    Ok(())
}

/// Locate `catalog.json`: explicit override, next to the executable, then the
/// working directory
fn resolve_catalog_path() -> PathBuf {
    if let Ok(path) = env::var(CATALOG_FILE_VAR) {
        return PathBuf::from(path);
    }

    if let Ok(exe) = env::current_exe() {
        if let Some(dir) = exe.parent() {
            let candidate = dir.join(CATALOG_FILE_NAME);
            if candidate.exists() {
                return candidate;
            }
        }
    }

    PathBuf::from(CATALOG_FILE_NAME)
}
