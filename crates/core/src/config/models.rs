//! Resolved application configuration.

use std::path::{Path, PathBuf};
use vp_protocol::config_models::GlobalConfig;

/// Name of the per-workspace configuration directory.
pub const CONFIG_DIR: &str = ".video-pipeline";

/// Configuration loaded from a workspace's `.video-pipeline/` directory.
///
/// # Example
///
/// ```rust,no_run
/// use vp_core::config::loader::load_config;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new(".")).await?;
/// println!("Snapshots live in {}", config.projects_dir().display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Global settings from `config.toml`.
    pub global: GlobalConfig,

    /// Workspace root the configuration was loaded from.
    pub root: PathBuf,
}

impl AppConfig {
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            global: GlobalConfig::default(),
            root: root.into(),
        }
    }

    /// `<root>/.video-pipeline`
    pub fn config_dir(&self) -> PathBuf {
        self.root.join(CONFIG_DIR)
    }

    /// Directory holding project snapshots. Relative `projects-dir` values
    /// resolve against the configuration directory.
    pub fn projects_dir(&self) -> PathBuf {
        let configured = Path::new(&self.global.projects_dir);
        if configured.is_absolute() {
            configured.to_path_buf()
        } else {
            self.config_dir().join(configured)
        }
    }
}
