//! # vp-protocol
//!
//! Core protocol definitions and data models for video-pipeline-kit.
//!
//! This crate defines all shared data structures used for:
//! - The seven-stage production pipeline and its project aggregate
//! - Durable project snapshots exchanged with storage layers
//! - Configuration file parsing (`.video-pipeline/config.toml`)
//! - Commands and outcome events exchanged with the state container
//!
//! ## Modules
//!
//! - [`stage_models`]: Pipeline stages and their ordering
//! - [`brief_models`]: Authoring brief and partial updates
//! - [`scene_models`]: Storyboard scenes and partial updates
//! - [`generation_models`]: Per-scene generation outcomes
//! - [`project_models`]: Decomposition plan, transitions and project snapshots
//! - [`config_models`]: Global configuration from config.toml
//! - [`ipc`]: Operations and Events for driving the state container
//!
//! ## Design Principles
//!
//! - Minimal dependencies: serde, ts-rs, thiserror and chrono
//! - TypeScript generation: All types derive `TS` for client compatibility
//! - Independent compilation: No dependencies on other video-pipeline-kit crates

pub mod brief_models;
pub mod config_models;
pub mod generation_models;
pub mod ipc;
pub mod project_models;
pub mod scene_models;
pub mod stage_models;

// Re-export all public types for convenience
pub use brief_models::*;
pub use config_models::*;
pub use generation_models::*;
pub use ipc::*;
pub use project_models::*;
pub use scene_models::*;
pub use stage_models::*;
