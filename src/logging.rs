// Diagnostic logging.
// The terminal belongs to the TUI, so tracing output goes to a log file instead.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::cache::paths;
use crate::config::Config;
use crate::error::{PokedexError, Result};

/// Build the filter from `RUST_LOG`, falling back to the configured directive.
fn env_filter(config: &Config) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter))
}

/// Install the global subscriber. Without a platform cache dir logging is disabled.
pub fn init(config: &Config) -> Result<()> {
    match paths::log_path() {
        Some(path) => init_with_file(config, &path),
        None => Ok(()),
    }
}

fn init_with_file(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| PokedexError::Config(format!("logging: {}", e)))
}
