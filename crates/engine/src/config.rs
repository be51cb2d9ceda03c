use std::collections::HashSet;
use std::path::{Path, PathBuf};

use derive_builder::Builder;

use crate::error::{EngineError, Result};

/// Directories whose whole subtree is left out of the walk.
///
/// Each entry is stored as given and, when it exists, in canonical form, so
/// `./photos/old` and `/home/me/photos/old` both hit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    paths: HashSet<PathBuf>,
}

impl ExclusionSet {
    /// # Errors
    /// Returns [`EngineError::Config`] for an empty path or a path that exists
    /// but is not a directory.
    pub fn new<I, P>(dirs: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut paths = HashSet::new();
        for dir in dirs {
            let dir = dir.into();
            if dir.as_os_str().is_empty() {
                return Err(EngineError::Config("empty exclude path".into()));
            }
            if dir.exists() && !dir.is_dir() {
                return Err(EngineError::Config(format!(
                    "exclude path is not a directory: {}",
                    dir.display()
                )));
            }
            match dir.canonicalize() {
                Ok(canonical) => {
                    paths.insert(canonical);
                }
                Err(_) => log::warn!("exclude path does not exist: {}", dir.display()),
            }
            paths.insert(dir);
        }
        Ok(Self { paths })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Whether `dir` is one of the excluded directories.
    #[must_use]
    pub fn contains(&self, dir: &Path) -> bool {
        if self.is_empty() {
            return false;
        }
        self.paths.contains(dir)
            || dir
                .canonicalize()
                .is_ok_and(|canonical| self.paths.contains(&canonical))
    }
}

#[derive(Debug, Clone, Default, Builder)]
#[builder(setter(into), build_fn(error = "EngineError"))]
pub struct WalkOptions {
    #[builder(default)]
    pub roots: Vec<PathBuf>,
    #[builder(default)]
    pub exclude: ExclusionSet,
    #[builder(default)]
    pub follow_links: bool,
}

impl WalkOptions {
    /// Checks the roots before anything is walked.
    ///
    /// # Errors
    /// Returns [`EngineError::Config`] when no root is given or a root is not
    /// a directory.
    pub fn validate(&self) -> Result<()> {
        if self.roots.is_empty() {
            return Err(EngineError::Config("no folder to scan specified".into()));
        }
        for root in &self.roots {
            if root.to_string_lossy().contains('\0') {
                return Err(EngineError::Config("Path contains null bytes".into()));
            }
            if !root.is_dir() {
                return Err(EngineError::Config(format!(
                    "not a directory: {}",
                    root.display()
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Builder)]
#[builder(setter(into), build_fn(error = "EngineError"))]
pub struct Config {
    #[builder(default)]
    pub walk: WalkOptions,
}

impl Config {
    /// # Errors
    /// See [`WalkOptions::validate`].
    pub fn validate(&self) -> Result<()> {
        self.walk.validate()
    }
}
