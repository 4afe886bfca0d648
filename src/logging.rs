// Logging setup.
// The terminal belongs to the UI, so tracing output goes to a file.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::{HubError, Result};

pub const LOG_ENV: &str = "HUBNAV_LOG";

/// Install a global subscriber appending to `path`, filtered by `HUBNAV_LOG`
/// (default `info`).
pub fn init(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| HubError::Other(format!("logging: {}", e)))?;

    Ok(())
}
