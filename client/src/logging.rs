use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

use crate::error::ClientError;

/// Sends all tracing output to `log_path`; the terminal belongs to the game view.
/// Verbosity comes from `RUST_LOG`, defaulting to `info`.
pub fn init(log_path: &str) -> Result<(), ClientError> {
    let file = OpenOptions::new().create(true).append(true).open(log_path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| ClientError::Config(format!("logging already initialized: {e}")))
}
