use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("False date(time) in file name '{name}': {reason}")]
    TimestampParse { name: String, reason: String },

    #[error("Failed to read modification time of '{path}': {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Walk error: {0}")]
    Walk(#[from] ignore::Error),

    #[error("Config builder error: {0}")]
    Builder(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Errors that only concern a single candidate file; the scan goes on.
    #[must_use]
    pub const fn is_per_file(&self) -> bool {
        matches!(self, Self::TimestampParse { .. } | Self::Metadata { .. })
    }
}

impl From<derive_builder::UninitializedFieldError> for EngineError {
    fn from(e: derive_builder::UninitializedFieldError) -> Self {
        Self::Builder(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
