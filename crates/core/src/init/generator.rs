//! Directory structure generation for `.video-pipeline/` initialization.

use super::error::{InitError, InitResult};
use super::templates::{get_template, list_templates};
use crate::config::CONFIG_DIR;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Options for initializing a `.video-pipeline/` directory.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Directory in which `.video-pipeline/` is created.
    pub target_dir: PathBuf,

    /// Overwrite an existing `.video-pipeline/` directory.
    pub force: bool,

    /// Skip the sample plan files.
    pub minimal: bool,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            target_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            force: false,
            minimal: false,
        }
    }
}

/// Generate a `.video-pipeline/` directory:
///
/// ```text
/// .video-pipeline/
/// ├── config.toml
/// ├── projects/
/// └── plans/
///     └── sample-plan.yaml (unless minimal)
/// ```
///
/// Existing snapshots under `projects/` are left alone when `force` is set;
/// only template files are overwritten.
///
/// # Errors
/// Returns `InitError` if the directory already exists without `force`, a
/// template is missing, or the filesystem refuses a write.
pub async fn generate_structure(options: InitOptions) -> InitResult<PathBuf> {
    let vp_dir = options.target_dir.join(CONFIG_DIR);

    if vp_dir.exists() && !options.force {
        return Err(InitError::DirectoryExists(vp_dir));
    }

    let projects_dir = vp_dir.join("projects");
    fs::create_dir_all(&projects_dir).map_err(|source| InitError::DirectoryCreate {
        path: projects_dir.clone(),
        source,
    })?;

    write_template_file(&vp_dir, "config.toml")?;

    if !options.minimal {
        for plan_path in list_templates("plans/") {
            write_template_file(&vp_dir, &plan_path)?;
        }
    }

    info!(path = %vp_dir.display(), "Initialized video pipeline workspace");
    Ok(vp_dir)
}

fn write_template_file(vp_dir: &Path, template_path: &str) -> InitResult<()> {
    let content = get_template(template_path)
        .ok_or_else(|| InitError::TemplateNotFound(template_path.to_string()))?;

    let target_path = vp_dir.join(template_path);

    if let Some(parent) = target_path.parent() {
        fs::create_dir_all(parent).map_err(|source| InitError::DirectoryCreate {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(&target_path, content).map_err(|source| InitError::FileWrite {
        path: target_path,
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_generate_structure_success() {
        let dir = tempdir().unwrap();
        let options = InitOptions {
            target_dir: dir.path().to_path_buf(),
            force: false,
            minimal: false,
        };

        let vp_dir = generate_structure(options).await.unwrap();

        assert_eq!(vp_dir, dir.path().join(".video-pipeline"));
        assert!(vp_dir.join("config.toml").exists());
        assert!(vp_dir.join("projects").is_dir());
        assert!(vp_dir.join("plans/sample-plan.yaml").exists());

        // The generated config loads back through the normal loader.
        let config = load_config(dir.path()).await.unwrap();
        assert_eq!(config.projects_dir(), vp_dir.join("projects"));
        assert_eq!(config.global.defaults.resolution.as_deref(), Some("1080p"));
    }

    #[tokio::test]
    async fn test_generate_structure_minimal() {
        let dir = tempdir().unwrap();
        let options = InitOptions {
            target_dir: dir.path().to_path_buf(),
            force: false,
            minimal: true,
        };

        let vp_dir = generate_structure(options).await.unwrap();

        assert!(vp_dir.join("config.toml").exists());
        assert!(!vp_dir.join("plans").exists());
    }

    #[tokio::test]
    async fn test_generate_structure_exists_without_force() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join(".video-pipeline")).unwrap();

        let options = InitOptions {
            target_dir: dir.path().to_path_buf(),
            force: false,
            minimal: false,
        };

        let result = generate_structure(options).await;
        assert!(matches!(result, Err(InitError::DirectoryExists(_))));
    }

    #[tokio::test]
    async fn test_generate_structure_force_keeps_snapshots() {
        let dir = tempdir().unwrap();
        let projects = dir.path().join(".video-pipeline/projects");
        fs::create_dir_all(&projects).unwrap();
        fs::write(projects.join("p1.json"), "{}").unwrap();

        let options = InitOptions {
            target_dir: dir.path().to_path_buf(),
            force: true,
            minimal: true,
        };

        generate_structure(options).await.unwrap();

        assert!(projects.join("p1.json").exists());
        assert!(dir.path().join(".video-pipeline/config.toml").exists());
    }

    #[test]
    fn test_default_init_options() {
        let options = InitOptions::default();
        assert!(!options.force);
        assert!(!options.minimal);
    }
}
