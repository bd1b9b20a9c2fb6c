use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Page not found: {0}")]
    PageNotFound(String),

    #[error("Invalid title: {0:?}")]
    InvalidTitle(String),

    #[error("Path escapes the storage root: {}", .0.display())]
    PathSecurityViolation(PathBuf),

    #[error("Malformed log entry at line {line}: {reason}")]
    MalformedLogEntry { line: usize, reason: String },

    #[error("Revision {index} not found for page {title}")]
    RevisionNotFound { title: String, index: usize },

    #[error("Diff does not apply: {0}")]
    DiffMismatch(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// True for errors that signal "nothing stored yet" rather than a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::PageNotFound(_) | Error::RevisionNotFound { .. }
        )
    }
}
