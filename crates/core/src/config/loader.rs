//! Loader for the `.video-pipeline/` directory and decomposition plan files.
//!
//! - `config.toml`: Global settings
//! - plan files: the structured output of the decomposition step, in JSON or
//!   YAML, recorded verbatim on a project

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::models::AppConfig;
use std::path::Path;
use tracing::{debug, info};
use vp_protocol::config_models::GlobalConfig;
use vp_protocol::project_models::DecompositionPlan;

/// Loads configuration from `<root>/.video-pipeline/`.
///
/// A missing directory or a missing `config.toml` yields the default
/// configuration rather than an error.
///
/// # Errors
///
/// Returns `ConfigError` if `config.toml` exists but cannot be read, is not
/// valid TOML, or holds invalid values.
pub async fn load_config(root: &Path) -> ConfigResult<AppConfig> {
    let mut config = AppConfig::with_root(root);
    let config_path = config.config_dir().join("config.toml");

    if !tokio::fs::try_exists(&config_path).await.unwrap_or(false) {
        debug!(path = %config_path.display(), "No config.toml found, using defaults");
        return Ok(config);
    }

    config.global = load_global_config(&config_path).await?;
    info!(path = %config_path.display(), "Loaded configuration");
    Ok(config)
}

async fn load_global_config(config_path: &Path) -> ConfigResult<GlobalConfig> {
    let content = tokio::fs::read_to_string(config_path)
        .await
        .map_err(|source| ConfigError::FileRead {
            path: config_path.to_path_buf(),
            source,
        })?;

    let config: GlobalConfig =
        toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
            path: config_path.to_path_buf(),
            source,
        })?;

    if config.generation.max_concurrency == 0 {
        return Err(ConfigError::InvalidConfig {
            path: config_path.to_path_buf(),
            reason: "generation.max-concurrency must be at least 1".to_string(),
        });
    }
    if config.projects_dir.trim().is_empty() {
        return Err(ConfigError::InvalidConfig {
            path: config_path.to_path_buf(),
            reason: "projects-dir must not be empty".to_string(),
        });
    }

    Ok(config)
}

/// Loads a decomposition plan from a `.json`, `.yaml` or `.yml` file.
///
/// Reads the file synchronously. The content is kept as an opaque structured
/// value.
///
/// # Errors
///
/// Returns `ConfigError::UnsupportedPlanFormat` for any other extension, and
/// a read or parse error carrying the path otherwise.
pub fn load_plan(path: &Path) -> ConfigResult<DecompositionPlan> {
    let format = path
        .extension()
        .and_then(|s| s.to_str())
        .map(str::to_ascii_lowercase);

    let read = || {
        std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })
    };

    let value = match format.as_deref() {
        Some("json") => {
            serde_json::from_str(&read()?).map_err(|source| ConfigError::JsonParse {
                path: path.to_path_buf(),
                source,
            })?
        }
        Some("yaml") | Some("yml") => {
            serde_yaml::from_str(&read()?).map_err(|source| ConfigError::YamlParse {
                path: path.to_path_buf(),
                source,
            })?
        }
        _ => {
            return Err(ConfigError::UnsupportedPlanFormat {
                path: path.to_path_buf(),
            })
        }
    };

    debug!(path = %path.display(), "Loaded decomposition plan");
    Ok(DecompositionPlan::new(value))
}
