// crates/cli/src/logging.rs
use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;

use crate::error::{AppError, Result};
use crate::options::Verbosity;

/// Install the stderr logger.
///
/// `log` records from the engine reach the subscriber through its
/// `tracing-log` bridge. `RUST_LOG` takes precedence over `verbosity`.
///
/// # Errors
/// Returns an error if a global logger is already installed.
pub fn init(verbosity: Verbosity) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.directive()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .try_init()
        .map_err(|e| AppError::Logging(e.to_string()))
}
