//! Embedded template files for `.video-pipeline/` initialization.
//!
//! Files under the workspace `templates/` directory are embedded into the
//! binary at compile time, so `vpipe init` works without external files.

use rust_embed::RustEmbed;

/// Embedded template files from the `templates/` directory.
///
/// The path is relative to the crate root:
/// - `CARGO_MANIFEST_DIR` = `crates/core`
/// - `../../templates` = workspace root `templates/`
///
/// With the `debug-embed` feature, debug builds embed the files too instead
/// of reading them from disk.
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/../../templates"]
pub struct TemplateAssets;

/// Get template file content by path, e.g. `"config.toml"` or
/// `"plans/sample-plan.yaml"`.
///
/// # Example
/// ```
/// use vp_core::init::templates::get_template;
///
/// let config = get_template("config.toml").expect("config.toml should exist");
/// assert!(config.contains("projects-dir ="));
/// ```
pub fn get_template(path: &str) -> Option<String> {
    TemplateAssets::get(path).map(|file| String::from_utf8_lossy(file.data.as_ref()).to_string())
}

/// List all template files whose path starts with `prefix`.
pub fn list_templates(prefix: &str) -> Vec<String> {
    TemplateAssets::iter()
        .filter(|path| path.starts_with(prefix))
        .map(|path| path.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use vp_protocol::config_models::GlobalConfig;

    #[test]
    fn test_config_template_parses() {
        let content = get_template("config.toml").expect("config.toml should be embedded");
        let config: GlobalConfig = toml::from_str(&content).expect("template should be valid");

        assert_eq!(config.projects_dir, "projects");
        assert!(config.autosave);
        assert_eq!(config.generation.max_concurrency, 4);
        assert_eq!(config.defaults.aspect_ratio.as_deref(), Some("16:9"));
    }

    #[test]
    fn test_sample_plan_template() {
        let plan = get_template("plans/sample-plan.yaml").expect("sample plan should be embedded");
        let value: serde_json::Value = serde_yaml::from_str(&plan).expect("plan should be YAML");
        assert!(value.get("beats").is_some());
    }

    #[test]
    fn test_get_nonexistent_template() {
        assert!(get_template("nonexistent.txt").is_none());
    }

    #[test]
    fn test_list_plan_templates() {
        let plans = list_templates("plans/");
        assert_eq!(plans, vec!["plans/sample-plan.yaml".to_string()]);
        assert!(list_templates("").len() >= 2);
    }
}
