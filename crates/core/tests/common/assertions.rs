//! Custom assertion helpers.

use vp_core::state::PipelineStore;
use vp_protocol::ipc::Event;

/// Assert that every scene's ordinal equals its position plus one.
#[allow(dead_code)]
pub fn assert_ordinals(store: &PipelineStore) {
    for (index, scene) in store.project().scenes().iter().enumerate() {
        assert_eq!(
            scene.ordinal as usize,
            index + 1,
            "scene {} at index {} has ordinal {}",
            scene.id,
            index,
            scene.ordinal
        );
    }
}

/// Scene identities in storyboard order.
#[allow(dead_code)]
pub fn scene_ids(store: &PipelineStore) -> Vec<String> {
    store
        .project()
        .scenes()
        .iter()
        .map(|s| s.id.clone())
        .collect()
}

/// Count events that rejected their operation.
#[allow(dead_code)]
pub fn count_rejections(events: &[Event]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, Event::Rejected { .. }))
        .count()
}
