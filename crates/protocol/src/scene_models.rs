//! Storyboard scene models.
//!
//! A scene has a stable identity assigned at creation and a 1-based ordinal
//! that always mirrors its position in the storyboard. Ordinals are derived by
//! the scene collection, never set by callers, so neither [`NewScene`] nor
//! [`ScenePatch`] carries one.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use ts_rs::TS;

/// A single unit of the storyboard.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    /// Unique identity, assigned by the identity generator.
    pub id: String,

    /// 1-based position in the storyboard.
    pub ordinal: u32,

    /// Narration or dialogue for the scene.
    #[serde(default)]
    pub script: String,

    /// Free-text visual direction for the renderer.
    #[serde(default)]
    pub visual_direction: String,

    /// Planned duration in seconds.
    #[serde(default)]
    pub duration_secs: f64,

    /// Stage-specific authoring fields the pipeline does not interpret.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    #[ts(type = "Record<string, unknown>")]
    pub attributes: Map<String, Value>,
}

impl Scene {
    /// Whether the script contains anything besides whitespace.
    pub fn has_script(&self) -> bool {
        !self.script.trim().is_empty()
    }

    /// Merge every field present in `patch`. Identity and ordinal are
    /// untouched.
    pub fn merge(&mut self, patch: ScenePatch) {
        if let Some(script) = patch.script {
            self.script = script;
        }
        if let Some(visual_direction) = patch.visual_direction {
            self.visual_direction = visual_direction;
        }
        if let Some(duration_secs) = patch.duration_secs {
            self.duration_secs = duration_secs;
        }
        if let Some(attributes) = patch.attributes {
            self.attributes.extend(attributes);
        }
    }
}

/// A scene as supplied by the caller, before identity and ordinal are
/// assigned.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct NewScene {
    #[serde(default)]
    pub script: String,
    #[serde(default)]
    pub visual_direction: String,
    #[serde(default)]
    pub duration_secs: f64,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    #[ts(type = "Record<string, unknown>")]
    pub attributes: Map<String, Value>,
}

impl NewScene {
    /// A new scene carrying only a script.
    pub fn with_script(script: impl Into<String>) -> Self {
        Self {
            script: script.into(),
            ..Self::default()
        }
    }

    /// Attach an identity and ordinal, producing a storyboard scene.
    pub fn into_scene(self, id: String, ordinal: u32) -> Scene {
        Scene {
            id,
            ordinal,
            script: self.script,
            visual_direction: self.visual_direction,
            duration_secs: self.duration_secs,
            attributes: self.attributes,
        }
    }
}

/// Partial update for a [`Scene`].
///
/// `attributes` entries are merged key by key into the existing map.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct ScenePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual_direction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "Record<string, unknown> | null")]
    pub attributes: Option<Map<String, Value>>,
}

impl ScenePatch {
    /// Patch that only sets the script.
    pub fn script(script: impl Into<String>) -> Self {
        Self {
            script: Some(script.into()),
            ..Self::default()
        }
    }
}
