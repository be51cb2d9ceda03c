use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{EngineError, Result};
use crate::filesystem::{Candidate, TreeWalker};
use crate::reconcile::{FsModifiedTime, ModifiedTime, reconcile};
use crate::record::{RecordSink, ResolvedRecord};
use crate::stamp::match_stamp;

/// Counters for one scan.
#[derive(Debug, Default)]
pub struct RunResult {
    /// Files seen by the walker.
    pub candidates: usize,
    /// Files whose name carried a stamp, valid or not.
    pub matched: usize,
    /// Records handed to the sink.
    pub emitted: usize,
    /// Matched files that were left out, with the reason.
    pub skipped: Vec<(PathBuf, EngineError)>,
}

/// Drives walker, matcher and reconciler over all roots of a [`Config`].
#[derive(Debug)]
pub struct IndexBuilder<M = FsModifiedTime> {
    walker: TreeWalker,
    mtime: M,
}

impl IndexBuilder<FsModifiedTime> {
    /// # Errors
    /// Returns [`EngineError::Config`] if the configuration does not validate.
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_modified_time(config, FsModifiedTime)
    }
}

impl<M: ModifiedTime> IndexBuilder<M> {
    /// Like [`IndexBuilder::new`] with a custom modification time source.
    ///
    /// # Errors
    /// Returns [`EngineError::Config`] if the configuration does not validate.
    pub fn with_modified_time(config: &Config, mtime: M) -> Result<Self> {
        Ok(Self {
            walker: TreeWalker::new(&config.walk)?,
            mtime,
        })
    }

    /// Scans every root and emits one record per stamped file.
    ///
    /// Bad stamps and unreadable files are logged and skipped. A file reached
    /// a second time, through overlapping roots or another spelling of the
    /// same directory, is passed over.
    ///
    /// # Errors
    /// Only a failing sink ends the run early.
    pub fn run<S: RecordSink + ?Sized>(&self, sink: &mut S) -> Result<RunResult> {
        let mut result = RunResult::default();
        let mut seen = HashSet::new();

        for root in self.walker.roots() {
            log::debug!("scanning {}", root.display());
            for candidate in self.walker.walk_root(root) {
                if !seen.insert(file_identity(&candidate.path)) {
                    log::debug!("already visited: {}", candidate.path.display());
                    continue;
                }
                result.candidates += 1;
                match self.resolve(&candidate) {
                    None => {}
                    Some(Ok(record)) => {
                        result.matched += 1;
                        log::debug!("{} {}", record.timestamp(), record.link().display());
                        sink.emit(record)?;
                        result.emitted += 1;
                    }
                    Some(Err(err)) if !err.is_per_file() => return Err(err),
                    Some(Err(err)) => {
                        result.matched += 1;
                        log::warn!("skipping {}: {err}", candidate.path.display());
                        result.skipped.push((candidate.path, err));
                    }
                }
            }
        }

        Ok(result)
    }

    /// `None` when the name carries no stamp.
    fn resolve(&self, candidate: &Candidate) -> Option<Result<ResolvedRecord>> {
        let stamp = match_stamp(&candidate.name)?;
        Some(
            reconcile(&stamp, &candidate.path, &self.mtime).map(|timestamp| {
                ResolvedRecord::new(timestamp, candidate.path.clone(), candidate.name.clone())
            }),
        )
    }
}

// The directory is resolved but the last component is kept, so a symlink and
// its target stay two entries while `a/sub` and `a/sub/../sub` become one.
fn file_identity(path: &Path) -> PathBuf {
    match (path.parent(), path.file_name()) {
        (Some(dir), Some(name)) => dir
            .canonicalize()
            .map_or_else(|_| path.to_path_buf(), |dir| dir.join(name)),
        _ => path.to_path_buf(),
    }
}
