//! State management for video pipeline projects.
//!
//! This module provides:
//! - Ordered scene collection with ordinal renumbering
//! - Generation result ledger keyed by scene identity
//! - Transition gates for every pipeline stage
//! - `PipelineStore`, the single owner of a project's state

pub mod error;
pub mod gate;
pub mod id;
pub mod ledger;
pub mod ops;
pub mod project;
pub mod scenes;

pub use error::{LedgerError, SceneError};
pub use gate::GateBlocker;
pub use id::{IdGenerator, SequentialIdGenerator, UuidIdGenerator};
pub use ledger::GenerationLedger;
pub use project::{PipelineProject, PipelineStore};
pub use scenes::SceneCollection;
