//! Project-level models and the durable snapshot shape.
//!
//! [`ProjectSnapshot`] is the persistence contract: every durable field of a
//! pipeline project and nothing else. The in-progress flags a caller toggles
//! around generation and assembly are deliberately absent so that a resumed
//! project never reopens in a stuck state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use ts_rs::TS;

use crate::brief_models::Brief;
use crate::generation_models::GenerationResult;
use crate::scene_models::Scene;
use crate::stage_models::PipelineStage;

/// Structured plan produced by the external decomposition step.
///
/// The pipeline only cares whether a plan exists; its contents are opaque.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(transparent)]
pub struct DecompositionPlan(#[ts(type = "unknown")] pub Value);

impl DecompositionPlan {
    /// Wrap an arbitrary JSON value.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Borrow the underlying JSON value.
    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

/// Transition style used between scenes during assembly.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, TS)]
#[serde(rename_all = "lowercase")]
pub enum TransitionType {
    Cut,
    #[default]
    Fade,
    Dissolve,
    Wipe,
    Slide,
}

impl TransitionType {
    /// Every supported transition style.
    pub const ALL: [TransitionType; 5] = [
        TransitionType::Cut,
        TransitionType::Fade,
        TransitionType::Dissolve,
        TransitionType::Wipe,
        TransitionType::Slide,
    ];

    /// Wire name, identical to the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cut => "cut",
            Self::Fade => "fade",
            Self::Dissolve => "dissolve",
            Self::Wipe => "wipe",
            Self::Slide => "slide",
        }
    }
}

impl fmt::Display for TransitionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a transition style.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown transition type '{0}'")]
pub struct ParseTransitionError(pub String);

impl FromStr for TransitionType {
    type Err = ParseTransitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ParseTransitionError(s.to_string()))
    }
}

/// Every durable field of a pipeline project.
///
/// Unknown fields are ignored on deserialization, so snapshots written by
/// clients that also stored their in-progress flags load cleanly.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSnapshot {
    #[serde(default)]
    pub project_id: Option<String>,

    #[serde(default)]
    pub project_name: String,

    #[serde(default)]
    pub current_step: PipelineStage,

    #[serde(default)]
    pub brief: Brief,

    #[serde(default)]
    pub decomposition_plan: Option<DecompositionPlan>,

    #[serde(default)]
    pub scenes: Vec<Scene>,

    #[serde(default)]
    pub selected_avatar: Option<String>,

    #[serde(default)]
    pub selected_voice: Option<String>,

    #[serde(default)]
    pub generation_results: Vec<GenerationResult>,

    #[serde(default)]
    pub final_video_url: Option<String>,

    #[serde(default)]
    pub transition_type: TransitionType,
}

/// Lightweight listing entry returned by snapshot stores.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotSummary {
    pub project_id: String,
    pub project_name: String,
    pub current_step: PipelineStage,
    pub scene_count: usize,
    #[ts(type = "string")]
    pub saved_at: DateTime<Utc>,
}

impl SnapshotSummary {
    /// Summarize a snapshot stored under `project_id` at `saved_at`.
    pub fn of(project_id: String, snapshot: &ProjectSnapshot, saved_at: DateTime<Utc>) -> Self {
        Self {
            project_id,
            project_name: snapshot.project_name.clone(),
            current_step: snapshot.current_step,
            scene_count: snapshot.scenes.len(),
            saved_at,
        }
    }
}
