use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Org-mode outline with one heading per file
    #[default]
    Org,
    /// One JSON object per line
    Jsonl,
}

/// How chatty the log output on stderr is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verbosity {
    /// Errors only
    Quiet,
    /// Warnings such as skipped files
    #[default]
    Normal,
    /// Every excluded directory and every record found
    Verbose,
}

impl Verbosity {
    #[must_use]
    pub const fn from_flags(verbose: bool, suppress: bool) -> Self {
        match (verbose, suppress) {
            (true, _) => Self::Verbose,
            (false, true) => Self::Quiet,
            (false, false) => Self::Normal,
        }
    }

    /// Default filter directive when `RUST_LOG` is not set.
    #[must_use]
    pub const fn directive(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "warn",
            Self::Verbose => "debug",
        }
    }
}
