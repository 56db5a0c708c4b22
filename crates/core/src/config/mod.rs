//! Configuration loading and management.
//!
//! This module loads `.video-pipeline/config.toml` and external decomposition
//! plan files.

pub mod error;
pub mod loader;
pub mod models;

pub use error::{ConfigError, ConfigResult};
pub use loader::{load_config, load_plan};
pub use models::{AppConfig, CONFIG_DIR};
