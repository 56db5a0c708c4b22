//! Command/outcome protocol for driving a pipeline project.
//!
//! The protocol follows an Operation/Event pattern:
//! - `Op`: Commands sent by a caller (UI, CLI, automation, renderer tasks)
//! - `Event`: The outcome of applying one command to the project
//!
//! Asynchronous producers such as per-scene render tasks never touch the
//! project directly. They send `Op`s over a channel to the single owner of the
//! project, which applies them one at a time.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::brief_models::BriefPatch;
use crate::generation_models::{GenerationResult, GenerationResultPatch, GenerationStatus};
use crate::project_models::{DecompositionPlan, ProjectSnapshot, TransitionType};
use crate::scene_models::{NewScene, Scene, ScenePatch};
use crate::stage_models::PipelineStage;

/// Operations applied to a pipeline project.
///
/// Uses tagged enum serialization for TypeScript compatibility:
/// ```json
/// {
///   "type": "updateGenerationResult",
///   "payload": {
///     "scene_id": "0b5c...",
///     "patch": { "status": "completed", "outputUrl": "https://..." }
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Op {
    /// Replace the project identity.
    SetProjectId { project_id: Option<String> },

    /// Replace the display name.
    SetProjectName { name: String },

    /// Merge a partial brief.
    SetBrief { patch: BriefPatch },

    /// Record the plan returned by the decomposition step.
    SetDecompositionPlan { plan: Option<DecompositionPlan> },

    /// Append a scene; identity and ordinal are assigned by the project.
    AddScene { scene: NewScene },

    /// Merge fields into an existing scene.
    UpdateScene { scene_id: String, patch: ScenePatch },

    /// Delete a scene.
    RemoveScene { scene_id: String },

    /// Move the scene at `from_index` to `to_index`.
    ReorderScenes { from_index: usize, to_index: usize },

    /// Select an avatar reference.
    SetAvatar { avatar_id: Option<String> },

    /// Select a voice reference.
    SetVoice { voice_id: Option<String> },

    /// Select the transition style used during assembly.
    SetTransitionType { transition: TransitionType },

    /// Replace the whole generation ledger.
    SetGenerationResults { results: Vec<GenerationResult> },

    /// Merge a render report into the entry for one scene.
    UpdateGenerationResult {
        scene_id: String,
        patch: GenerationResultPatch,
    },

    /// Record the assembled video reference.
    SetFinalVideoUrl { url: Option<String> },

    /// Toggle the transient "generating" flag.
    SetGenerating { value: bool },

    /// Toggle the transient "assembling" flag.
    SetAssembling { value: bool },

    /// Jump to any stage without gating (review and back-navigation).
    SetCurrentStep { step: PipelineStage },

    /// Move to the next stage if its gate admits it.
    AdvanceStep,

    /// Move to the previous stage without gating.
    GoBack,

    /// Restore the initial empty project.
    Reset,

    /// Replace every durable field from a snapshot.
    LoadProject { snapshot: ProjectSnapshot },
}

/// Outcome of applying one [`Op`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Event {
    /// A field was updated.
    Updated,

    /// A scene was appended.
    SceneAdded { scene: Scene },

    /// The storyboard structure changed (update, remove or reorder).
    ScenesChanged { scene_count: usize },

    /// The ledger entry for a scene changed.
    GenerationResultUpdated {
        scene_id: String,
        status: GenerationStatus,
    },

    /// The current stage changed.
    StepChanged {
        from: PipelineStage,
        to: PipelineStage,
    },

    /// A gated advance was refused. Normal flow, not an error.
    AdvanceBlocked {
        target: Option<PipelineStage>,
        reason: String,
    },

    /// The project was restored to its initial state.
    ProjectReset,

    /// The project was rehydrated from a snapshot.
    ProjectLoaded { project_id: Option<String> },

    /// The operation was caller misuse and left the project unchanged.
    Rejected { reason: String },
}

impl Event {
    /// Whether the operation left the project unchanged.
    pub fn is_noop(&self) -> bool {
        matches!(self, Event::AdvanceBlocked { .. } | Event::Rejected { .. })
    }
}
