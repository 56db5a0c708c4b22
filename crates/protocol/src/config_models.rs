//! Global configuration models for `.video-pipeline/config.toml`.
//!
//! This module defines the structure of the global configuration file that
//! controls project-wide settings for video-pipeline-kit.

use serde::Deserialize;
use serde::Serialize;
use ts_rs::TS;

use crate::brief_models::BriefPatch;

/// Represents global settings from `.video-pipeline/config.toml`.
///
/// # Example
///
/// ```toml
/// # .video-pipeline/config.toml
/// projects-dir = "projects"
/// autosave = true
///
/// [generation]
/// max-concurrency = 4
///
/// [defaults]
/// aspect-ratio = "16:9"
/// resolution = "1080p"
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(rename_all = "kebab-case")]
pub struct GlobalConfig {
    /// Directory, relative to `.video-pipeline/`, holding project snapshots.
    #[serde(default = "default_projects_dir")]
    pub projects_dir: String,

    /// Persist the project after every mutating CLI command.
    #[serde(default = "default_autosave")]
    pub autosave: bool,

    /// Generation fan-out settings.
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Brief values applied to freshly created projects.
    #[serde(default)]
    pub defaults: BriefDefaults,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            projects_dir: default_projects_dir(),
            autosave: default_autosave(),
            generation: GenerationConfig::default(),
            defaults: BriefDefaults::default(),
        }
    }
}

fn default_projects_dir() -> String {
    "projects".to_string()
}

fn default_autosave() -> bool {
    true
}

/// Settings for dispatching scene renders.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
#[serde(rename_all = "kebab-case")]
pub struct GenerationConfig {
    /// Maximum number of scenes rendered at the same time.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
        }
    }
}

fn default_max_concurrency() -> usize {
    4
}

/// Brief defaults for new projects. Unset keys leave the brief empty.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, TS)]
#[serde(rename_all = "kebab-case")]
pub struct BriefDefaults {
    #[serde(default)]
    pub video_type: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub duration_secs: Option<u32>,
    #[serde(default)]
    pub aspect_ratio: Option<String>,
    #[serde(default)]
    pub resolution: Option<String>,
}

impl BriefDefaults {
    /// The defaults as a brief patch. The description is never defaulted.
    pub fn to_patch(&self) -> BriefPatch {
        BriefPatch {
            description: None,
            video_type: self.video_type.clone(),
            platform: self.platform.clone(),
            duration_secs: self.duration_secs,
            aspect_ratio: self.aspect_ratio.clone(),
            resolution: self.resolution.clone(),
        }
    }
}
