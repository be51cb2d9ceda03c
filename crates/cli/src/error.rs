// crates/cli/src/error.rs
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Engine(#[from] stampindex_engine::error::EngineError),

    #[error("Cannot open output '{path}': {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
