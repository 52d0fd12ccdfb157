//! Error types for jdiff-core.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for jdiff-core operations.
pub type Result<T> = std::result::Result<T, CompareError>;

/// Errors that can occur while comparing sources.
///
/// Parse and I/O failures abort the comparison of the file pair they occur in.
/// Invariant violations indicate a bug in the matcher or comparator and are
/// never swallowed.
#[derive(Error, Debug)]
pub enum CompareError {
    /// The source file could not be parsed.
    #[error("Parse error in {path}:{line}:{column}: {message}")]
    Parse {
        /// Path (or display name) of the file that failed to parse.
        path: String,
        /// 1-based line of the first syntax error.
        line: u32,
        /// 1-based column of the first syntax error.
        column: u32,
        /// Description of the failure.
        message: String,
    },

    /// Reading a file or directory failed.
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A structural invariant of the engine was broken.
    #[error("Invariant violated: {0}")]
    InvariantViolation(String),

    /// A Java source version string could not be understood.
    #[error("Invalid source version: {0}")]
    InvalidVersion(String),

    /// Directory scanning failed.
    #[error("Scan error: {0}")]
    Scan(String),

    /// The processor was given names it cannot pair up.
    #[error("Invalid arguments: {0}")]
    Usage(String),
}

impl CompareError {
    /// Wrap an I/O error together with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CompareError::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` for errors that indicate a bug rather than bad input.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, CompareError::InvariantViolation(_))
    }
}
