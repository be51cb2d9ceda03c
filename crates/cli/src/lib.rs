// crates/cli/src/lib.rs
pub mod args;
pub mod config;
pub mod error;
pub mod logging;
pub mod options;
pub mod parsers;
pub mod writer;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

use crate::config::RunConfig;
use crate::error::Result;
use crate::writer::WriteSummary;
use stampindex_engine::index::RunResult;

/// Scan and write the index as configured.
///
/// `config` is expected to come from `RunConfig::try_from`, which has
/// already checked the folders.
///
/// # Errors
/// Output errors. Files with bad stamps are only logged.
pub fn run(config: &RunConfig) -> Result<(RunResult, WriteSummary)> {
    let mut writer = writer::open(&config.output)?;
    let result = stampindex_engine::run(&config.engine, &mut writer)?;
    let summary = writer.finish(&result)?;

    log::info!(
        "{} files seen, {} stamped, {} written, {} already indexed, {} skipped",
        result.candidates,
        result.matched,
        summary.written,
        summary.duplicates,
        result.skipped.len()
    );
    Ok((result, summary))
}
