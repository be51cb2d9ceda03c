// crates/engine/src/lib.rs
pub mod config;
pub mod error;
pub mod filesystem;
pub mod index;
pub mod reconcile;
pub mod record;
pub mod stamp;

use crate::config::Config;
use crate::error::Result;
use crate::index::{IndexBuilder, RunResult};
use crate::record::RecordSink;

/// Run one full scan, emitting a record per stamped file into `sink`.
///
/// Files with an unparsable stamp or unreadable metadata are logged and
/// collected in `RunResult::skipped`; they never fail the run.
///
/// # Errors
///
/// Returns an error for an invalid configuration (checked before anything is
/// walked) or when `sink` fails to accept a record.
pub fn run<S: RecordSink + ?Sized>(config: &Config, sink: &mut S) -> Result<RunResult> {
    IndexBuilder::new(config)?.run(sink)
}
