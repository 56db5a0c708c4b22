//! # vp-core
//!
//! Core state machine and adapters for video-pipeline-kit.
//!
//! This crate provides:
//! - The pipeline project state container with its scene collection,
//!   generation ledger and stage gates
//! - Snapshot persistence
//! - Bounded-concurrency scene generation and final assembly
//! - Configuration loading from the `.video-pipeline/` directory
//!
//! ## Modules
//!
//! - [`state`]: Project state, scene ordering, ledger and gates
//! - [`persistence`]: Snapshot stores
//! - [`renderers`]: Renderer and assembler traits with mock implementations
//! - [`engine`]: Generation dispatcher and assembly
//! - [`config`]: Configuration and plan loading
//! - [`init`]: Workspace initialization

pub mod config;
pub mod engine;
pub mod init;
pub mod persistence;
pub mod renderers;
pub mod state;
