//! Error types for snapshot persistence.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapshotError {
    /// Snapshots are keyed by project id; one without an id cannot be stored.
    #[error("Snapshot has no project id")]
    MissingProjectId,

    /// The id would escape the store directory or is otherwise unusable as a
    /// key.
    #[error("Invalid project id: {0:?}")]
    InvalidProjectId(String),

    #[error("No snapshot stored for project {0}")]
    NotFound(String),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize snapshot: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Failed to parse snapshot at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to traverse directory {path}: {source}")]
    DirectoryWalk {
        path: PathBuf,
        source: walkdir::Error,
    },

    #[error("Background write task failed: {0}")]
    Task(String),
}

pub type SnapshotResult<T> = Result<T, SnapshotError>;
