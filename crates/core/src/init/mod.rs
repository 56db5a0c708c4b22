//! Initialization of `.video-pipeline/` workspace directories.
//!
//! Generates a configuration file, an empty snapshot directory and sample
//! decomposition plans from embedded templates.
//!
//! # Example
//!
//! ```no_run
//! use vp_core::init::{generate_structure, InitOptions};
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let options = InitOptions {
//!     target_dir: PathBuf::from("."),
//!     force: false,
//!     minimal: false,
//! };
//!
//! generate_structure(options).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod generator;
pub mod templates;

pub use error::{InitError, InitResult};
pub use generator::{generate_structure, InitOptions};
pub use templates::{get_template, list_templates};
