//! Engine error type and exit-code mapping.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use emfield_core::error::ConfigError;
use emfield_pattern::PatternError;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that abort an analysis run.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Pattern file for one antenna failed to load.
    #[error("antenna '{antenna}': {source}")]
    Pattern {
        antenna: String,
        #[source]
        source: PatternError,
    },

    /// Output directory or file could not be written.
    #[error("cannot write {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("report serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV output failed: {0}")]
    Csv(#[from] csv::Error),
}

impl EngineError {
    /// Process exit code: 2 for configuration and pattern errors, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        match self {
            EngineError::Config(_) | EngineError::Pattern { .. } => 2,
            _ => 1,
        }
    }

    pub(crate) fn output(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> EngineError {
        let path = path.into();
        move |source| EngineError::Output { path, source }
    }
}
