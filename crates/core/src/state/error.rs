//! Error types for caller misuse of the project state.
//!
//! None of these are fatal. Every operation that returns one of these errors
//! leaves the project exactly as it was.

use thiserror::Error;

/// Misuse of the scene collection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// No scene carries the given identity.
    #[error("Scene not found: {0}")]
    NotFound(String),

    /// A reorder index lies outside the current storyboard.
    #[error("Scene index out of range: from {from} to {to} with {len} scenes")]
    IndexOutOfRange { from: usize, to: usize, len: usize },
}

/// Misuse of the generation ledger.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// No ledger entry exists for the given scene identity.
    #[error("No generation result for scene: {0}")]
    NotFound(String),
}

/// Type alias for Result with SceneError.
pub type SceneResult<T> = Result<T, SceneError>;

/// Type alias for Result with LedgerError.
pub type LedgerResult<T> = Result<T, LedgerError>;
