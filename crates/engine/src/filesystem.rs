use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ignore::{DirEntry, WalkBuilder};

use crate::config::{ExclusionSet, WalkOptions};
use crate::error::{EngineError, Result};

/// A file found under one of the roots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    pub name: String,
}

impl Candidate {
    fn from_entry(entry: &DirEntry) -> Self {
        Self {
            path: entry.path().to_path_buf(),
            name: entry.file_name().to_string_lossy().into_owned(),
        }
    }
}

/// Sequential recursive walk over validated roots.
#[derive(Debug, Clone)]
pub struct TreeWalker {
    roots: Vec<PathBuf>,
    exclude: Arc<ExclusionSet>,
    follow_links: bool,
}

impl TreeWalker {
    /// # Errors
    /// Returns [`EngineError::Config`] if the options do not validate.
    pub fn new(options: &WalkOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            roots: options.roots.clone(),
            exclude: Arc::new(options.exclude.clone()),
            follow_links: options.follow_links,
        })
    }

    #[must_use]
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Every file below `root`, skipping excluded subtrees.
    ///
    /// Unreadable directories are logged and passed over. `root` itself is
    /// checked against the exclusion set too.
    pub fn walk_root<'a>(&'a self, root: &'a Path) -> impl Iterator<Item = Candidate> + 'a {
        let excluded_root = self.exclude.contains(root);
        if excluded_root {
            log::info!("ignoring directory: {}", root.display());
        }

        let exclude = Arc::clone(&self.exclude);
        let mut builder = WalkBuilder::new(root);
        builder
            .standard_filters(false)
            .follow_links(self.follow_links)
            .filter_entry(move |entry| {
                let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
                if is_dir && exclude.contains(entry.path()) {
                    log::info!("ignoring directory: {}", entry.path().display());
                    return false;
                }
                true
            });

        let walk = (!excluded_root).then(|| builder.build());
        walk.into_iter()
            .flatten()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    log::warn!("{}", EngineError::Walk(err));
                    None
                }
            })
            .filter(is_file_entry)
            .map(|entry| Candidate::from_entry(&entry))
    }
}

// Without link following a symlink entry is reported as such; it still counts
// when it points at a regular file. A dangling link counts too, so reading its
// modification time fails later and gets reported.
fn is_file_entry(entry: &DirEntry) -> bool {
    match entry.file_type() {
        Some(ft) if ft.is_file() => true,
        Some(ft) if ft.is_symlink() => {
            fs::metadata(entry.path()).map_or(true, |meta| meta.is_file())
        }
        _ => false,
    }
}
