//! Pattern loading errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for pattern loading.
pub type PatternResult<T> = Result<T, PatternError>;

/// Errors raised while loading a pattern file. Queries never fail.
#[derive(Error, Debug)]
pub enum PatternError {
    /// File missing or unreadable.
    #[error("cannot read pattern file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A line or record that does not parse.
    #[error("malformed pattern file {path} at line {line}: {reason}")]
    Syntax {
        path: PathBuf,
        line: u64,
        reason: String,
    },

    /// File parsed but the table is unusable (missing cut, holes in the grid, ...).
    #[error("invalid pattern file {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },
}
