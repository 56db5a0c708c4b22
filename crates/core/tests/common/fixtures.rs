//! Test fixtures for building stores, projects and workspaces.

use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;
use vp_core::state::{PipelineStore, SequentialIdGenerator};
use vp_protocol::brief_models::BriefPatch;
use vp_protocol::project_models::DecompositionPlan;
use vp_protocol::scene_models::NewScene;
use vp_protocol::stage_models::PipelineStage;

/// An empty store whose scenes are identified `s1`, `s2`, ...
pub fn sequential_store() -> PipelineStore {
    PipelineStore::with_id_generator(Arc::new(SequentialIdGenerator::new("s")))
}

/// A store holding `n` scripted scenes, `s1` through `s<n>`.
#[allow(dead_code)]
pub fn store_with_scenes(n: usize) -> PipelineStore {
    let mut store = sequential_store();
    for i in 1..=n {
        store.add_scene(NewScene::with_script(format!("Scene {i} script")));
    }
    store
}

/// A store that satisfies every gate up to and including `generation`, with
/// `scene_count` scripted scenes.
#[allow(dead_code)]
pub fn approved_store(scene_count: usize) -> PipelineStore {
    let mut store = store_with_scenes(scene_count);
    store.set_project_id(Some("launch-video".to_string()));
    store.set_project_name("Launch video");
    store.set_brief(BriefPatch::description("demo video"));
    store.set_decomposition_plan(Some(DecompositionPlan::new(json!({
        "beats": ["hook", "demo", "call-to-action"]
    }))));
    store.set_avatar(Some("avatar-anna".to_string()));
    store.set_voice(Some("voice-warm".to_string()));
    store
}

/// Advance as far as the gates allow and return the stage reached.
#[allow(dead_code)]
pub fn advance_fully(store: &mut PipelineStore) -> PipelineStage {
    while store.advance_step() {}
    store.current_step()
}

/// A temporary workspace with an initialized `.video-pipeline/` directory.
///
/// Returns a TempDir that must be kept alive for the test duration.
#[allow(dead_code)]
pub async fn create_test_workspace() -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    vp_core::init::generate_structure(vp_core::init::InitOptions {
        target_dir: dir.path().to_path_buf(),
        force: false,
        minimal: true,
    })
    .await
    .expect("Failed to initialize workspace");
    dir
}
