//! Common test utilities shared by the integration tests.
//!
//! - Fixtures (stores with deterministic ids, populated projects, workspaces)
//! - Custom assertions

pub mod assertions;
pub mod fixtures;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;
