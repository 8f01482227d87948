//! Error types shared across the comparison core and its input collaborators.

use thiserror::Error;

/// Failure to parse or re-serialize JSON input.
#[derive(Debug, Error)]
pub enum JsonError {
    #[error("invalid JSON in {side}: {source}")]
    Parse {
        side: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize JSON: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Error types for git operations
#[derive(Debug, Error)]
pub enum GitError {
    /// File is not in a git repository
    #[error("Not a git repository")]
    NotARepo,
    /// File is not tracked (untracked/new file)
    #[error("File is not tracked")]
    NotTracked,
    /// File does not exist in HEAD (staged but never committed)
    #[error("File does not exist in HEAD")]
    NotInHead,
    /// Other git error
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),
}
