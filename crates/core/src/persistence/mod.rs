//! Project snapshot persistence.
//!
//! This module provides the `SnapshotStore` trait and two implementations:
//! one JSON file per project on disk, and an in-memory map.

pub mod base;
pub mod error;
pub mod file;
pub mod memory;

pub use base::{snapshot_key, validate_project_id, SnapshotStore};
pub use error::{SnapshotError, SnapshotResult};
pub use file::FileSnapshotStore;
pub use memory::MemorySnapshotStore;
