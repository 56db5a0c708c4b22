//! Pipeline project aggregate and its state container.
//!
//! [`PipelineProject`] holds every field of a project. It is only mutated
//! through [`PipelineStore`], which delegates scene and result bookkeeping to
//! [`SceneCollection`] and [`GenerationLedger`] and consults the gates in
//! [`crate::state::gate`] before honoring a stage advance.
//!
//! The store is a plain value owned by whoever drives it. It performs no I/O,
//! takes no locks and never suspends; callers needing concurrent producers
//! funnel their updates through a single owner (see [`crate::engine`]).

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};
use vp_protocol::brief_models::{Brief, BriefPatch};
use vp_protocol::generation_models::{GenerationResult, GenerationResultPatch};
use vp_protocol::project_models::{DecompositionPlan, ProjectSnapshot, TransitionType};
use vp_protocol::scene_models::{NewScene, Scene, ScenePatch};
use vp_protocol::stage_models::PipelineStage;

use crate::state::error::{LedgerResult, SceneResult};
use crate::state::gate::{self, GateBlocker};
use crate::state::id::{IdGenerator, UuidIdGenerator};
use crate::state::ledger::GenerationLedger;
use crate::state::scenes::SceneCollection;

/// Every field of a video project.
///
/// `is_generating` and `is_assembling` are transient progress signals. They
/// have no enforcement semantics, are never part of a [`ProjectSnapshot`] and
/// are false after every hydration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineProject {
    project_id: Option<String>,
    project_name: String,
    current_step: PipelineStage,
    brief: Brief,
    decomposition_plan: Option<DecompositionPlan>,
    scenes: SceneCollection,
    selected_avatar: Option<String>,
    selected_voice: Option<String>,
    generation_results: GenerationLedger,
    final_video_url: Option<String>,
    transition_type: TransitionType,
    is_generating: bool,
    is_assembling: bool,
}

impl PipelineProject {
    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn current_step(&self) -> PipelineStage {
        self.current_step
    }

    pub fn brief(&self) -> &Brief {
        &self.brief
    }

    pub fn decomposition_plan(&self) -> Option<&DecompositionPlan> {
        self.decomposition_plan.as_ref()
    }

    pub fn scenes(&self) -> &SceneCollection {
        &self.scenes
    }

    pub fn selected_avatar(&self) -> Option<&str> {
        self.selected_avatar.as_deref()
    }

    pub fn selected_voice(&self) -> Option<&str> {
        self.selected_voice.as_deref()
    }

    pub fn generation_results(&self) -> &GenerationLedger {
        &self.generation_results
    }

    pub fn final_video_url(&self) -> Option<&str> {
        self.final_video_url.as_deref()
    }

    pub fn transition_type(&self) -> TransitionType {
        self.transition_type
    }

    pub fn is_generating(&self) -> bool {
        self.is_generating
    }

    pub fn is_assembling(&self) -> bool {
        self.is_assembling
    }

    /// Extract every durable field.
    pub fn snapshot(&self) -> ProjectSnapshot {
        ProjectSnapshot {
            project_id: self.project_id.clone(),
            project_name: self.project_name.clone(),
            current_step: self.current_step,
            brief: self.brief.clone(),
            decomposition_plan: self.decomposition_plan.clone(),
            scenes: self.scenes.as_slice().to_vec(),
            selected_avatar: self.selected_avatar.clone(),
            selected_voice: self.selected_voice.clone(),
            generation_results: self.generation_results.as_slice().to_vec(),
            final_video_url: self.final_video_url.clone(),
            transition_type: self.transition_type,
        }
    }

    /// Rebuild a project from durable fields. Transient flags start false and
    /// scene ordinals are re-derived from the stored order.
    pub fn from_snapshot(snapshot: ProjectSnapshot) -> Self {
        let mut generation_results = GenerationLedger::new();
        generation_results.set_all(snapshot.generation_results);

        Self {
            project_id: snapshot.project_id,
            project_name: snapshot.project_name,
            current_step: snapshot.current_step,
            brief: snapshot.brief,
            decomposition_plan: snapshot.decomposition_plan,
            scenes: SceneCollection::from_scenes(snapshot.scenes),
            selected_avatar: snapshot.selected_avatar,
            selected_voice: snapshot.selected_voice,
            generation_results,
            final_video_url: snapshot.final_video_url,
            transition_type: snapshot.transition_type,
            is_generating: false,
            is_assembling: false,
        }
    }
}

/// State container owning one [`PipelineProject`].
#[derive(Clone)]
pub struct PipelineStore {
    project: PipelineProject,
    ids: Arc<dyn IdGenerator>,
}

impl Default for PipelineStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PipelineStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineStore")
            .field("project", &self.project)
            .finish_non_exhaustive()
    }
}

impl PipelineStore {
    /// An empty project at `request`, with random UUID scene identities.
    pub fn new() -> Self {
        Self::with_id_generator(Arc::new(UuidIdGenerator))
    }

    /// An empty project using `ids` for scene identities.
    pub fn with_id_generator(ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            project: PipelineProject::default(),
            ids,
        }
    }

    /// A store hydrated from `snapshot`.
    pub fn from_snapshot(snapshot: ProjectSnapshot) -> Self {
        let mut store = Self::new();
        store.load_project(snapshot);
        store
    }

    pub fn project(&self) -> &PipelineProject {
        &self.project
    }

    pub fn current_step(&self) -> PipelineStage {
        self.project.current_step
    }

    // -- field setters -------------------------------------------------------

    pub fn set_project_id(&mut self, project_id: Option<String>) {
        debug!(?project_id, "Setting project id");
        self.project.project_id = project_id;
    }

    pub fn set_project_name(&mut self, name: impl Into<String>) {
        self.project.project_name = name.into();
        debug!(name = %self.project.project_name, "Setting project name");
    }

    /// Merge a partial brief.
    pub fn set_brief(&mut self, patch: BriefPatch) {
        debug!(?patch, "Merging brief");
        self.project.brief.merge(patch);
    }

    /// Record the plan. Whether pre-production opens is decided by the gate
    /// when an advance is attempted, not here.
    pub fn set_decomposition_plan(&mut self, plan: Option<DecompositionPlan>) {
        debug!(present = plan.is_some(), "Setting decomposition plan");
        self.project.decomposition_plan = plan;
    }

    pub fn set_avatar(&mut self, avatar_id: Option<String>) {
        debug!(?avatar_id, "Selecting avatar");
        self.project.selected_avatar = avatar_id;
    }

    pub fn set_voice(&mut self, voice_id: Option<String>) {
        debug!(?voice_id, "Selecting voice");
        self.project.selected_voice = voice_id;
    }

    pub fn set_transition_type(&mut self, transition: TransitionType) {
        debug!(%transition, "Selecting transition");
        self.project.transition_type = transition;
    }

    pub fn set_final_video_url(&mut self, url: Option<String>) {
        debug!(?url, "Setting final video url");
        self.project.final_video_url = url;
    }

    pub fn set_generating(&mut self, value: bool) {
        self.project.is_generating = value;
    }

    pub fn set_assembling(&mut self, value: bool) {
        self.project.is_assembling = value;
    }

    /// Jump to any stage without consulting the gates.
    ///
    /// Used for review and back-navigation, which are always permitted.
    pub fn set_current_step(&mut self, step: PipelineStage) {
        if step != self.project.current_step {
            info!(from = %self.project.current_step, to = %step, "Navigating to stage");
        }
        self.project.current_step = step;
    }

    // -- scenes --------------------------------------------------------------

    /// Append a scene with a freshly generated identity.
    pub fn add_scene(&mut self, scene: NewScene) -> &Scene {
        self.project.scenes.add(self.ids.as_ref(), scene)
    }

    pub fn update_scene(&mut self, scene_id: &str, patch: ScenePatch) -> SceneResult<&Scene> {
        self.project.scenes.update(scene_id, patch)
    }

    /// Remove a scene. Its ledger entry, if any, is left in place as an
    /// orphan.
    pub fn remove_scene(&mut self, scene_id: &str) -> SceneResult<Scene> {
        self.project.scenes.remove(scene_id)
    }

    pub fn reorder_scenes(&mut self, from_index: usize, to_index: usize) -> SceneResult<()> {
        self.project.scenes.reorder(from_index, to_index)
    }

    // -- generation ledger ---------------------------------------------------

    pub fn set_generation_results(&mut self, results: Vec<GenerationResult>) {
        self.project.generation_results.set_all(results);
    }

    pub fn update_generation_result(
        &mut self,
        scene_id: &str,
        patch: GenerationResultPatch,
    ) -> LedgerResult<&GenerationResult> {
        self.project.generation_results.update(scene_id, patch)
    }

    /// A pending ledger entry for every scene currently in the storyboard.
    pub fn pending_results(&self) -> Vec<GenerationResult> {
        self.project
            .scenes
            .iter()
            .map(|scene| GenerationResult::pending(scene.id.clone()))
            .collect()
    }

    // -- transitions ---------------------------------------------------------

    pub fn can_advance_to(&self, stage: PipelineStage) -> bool {
        gate::can_advance_to(stage, &self.project)
    }

    pub fn blocker(&self, stage: PipelineStage) -> Option<GateBlocker> {
        gate::blocker(stage, &self.project)
    }

    /// Move to the immediate successor if its gate admits it.
    ///
    /// Returns whether the stage changed. A refused advance, including one
    /// from the last stage, leaves the project untouched.
    pub fn advance_step(&mut self) -> bool {
        let from = self.project.current_step;
        let Some(to) = from.next() else {
            debug!(stage = %from, "Already at the last stage");
            return false;
        };

        if let Some(reason) = self.blocker(to) {
            debug!(%from, %to, %reason, "Advance blocked");
            return false;
        }

        info!(%from, %to, "Advancing stage");
        self.project.current_step = to;
        true
    }

    /// Move to the immediate predecessor without gating.
    ///
    /// Returns whether the stage changed.
    pub fn go_back(&mut self) -> bool {
        match self.project.current_step.previous() {
            Some(previous) => {
                self.set_current_step(previous);
                true
            }
            None => false,
        }
    }

    // -- lifecycle -----------------------------------------------------------

    /// Restore the initial empty project, transient flags included.
    pub fn reset(&mut self) {
        info!(project_id = ?self.project.project_id, "Resetting project");
        self.project = PipelineProject::default();
    }

    /// Replace every durable field from `snapshot` and clear transient flags.
    pub fn load_project(&mut self, snapshot: ProjectSnapshot) {
        info!(
            project_id = ?snapshot.project_id,
            stage = %snapshot.current_step,
            scenes = snapshot.scenes.len(),
            "Loading project"
        );
        self.project = PipelineProject::from_snapshot(snapshot);
    }

    /// Every durable field of the current project.
    pub fn snapshot(&self) -> ProjectSnapshot {
        self.project.snapshot()
    }
}
