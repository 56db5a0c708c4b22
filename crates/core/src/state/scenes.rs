//! Ordered storyboard collection.
//!
//! Every structural change (add, remove, reorder) re-derives all ordinals from
//! the resulting order, so `scenes[i].ordinal == i + 1` holds after every
//! operation. Ordinals cannot be set any other way.

use tracing::debug;
use vp_protocol::scene_models::{NewScene, Scene, ScenePatch};

use crate::state::error::{SceneError, SceneResult};
use crate::state::id::IdGenerator;

/// The ordered scene sequence of a project.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneCollection {
    scenes: Vec<Scene>,
}

impl SceneCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection from existing scenes, keeping their order and
    /// re-deriving ordinals from it.
    pub fn from_scenes(scenes: Vec<Scene>) -> Self {
        let mut collection = Self { scenes };
        collection.renumber();
        collection
    }

    /// Append a scene with a fresh identity and return it.
    pub fn add(&mut self, ids: &dyn IdGenerator, scene: NewScene) -> &Scene {
        let id = ids.next_id();
        debug!(scene_id = %id, position = self.scenes.len(), "Adding scene");
        self.scenes.push(scene.into_scene(id, 0));
        self.renumber();
        let last = self.scenes.len() - 1;
        &self.scenes[last]
    }

    /// Merge `patch` into the scene with identity `scene_id`.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::NotFound`] if no scene has that identity.
    pub fn update(&mut self, scene_id: &str, patch: ScenePatch) -> SceneResult<&Scene> {
        let scene = self
            .scenes
            .iter_mut()
            .find(|s| s.id == scene_id)
            .ok_or_else(|| SceneError::NotFound(scene_id.to_string()))?;
        scene.merge(patch);
        debug!(scene_id, "Updated scene");
        Ok(&*scene)
    }

    /// Delete the scene with identity `scene_id` and renumber the rest.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::NotFound`] if no scene has that identity; the
    /// collection is left unchanged.
    pub fn remove(&mut self, scene_id: &str) -> SceneResult<Scene> {
        let index = self
            .position(scene_id)
            .ok_or_else(|| SceneError::NotFound(scene_id.to_string()))?;
        let removed = self.scenes.remove(index);
        self.renumber();
        debug!(scene_id, remaining = self.scenes.len(), "Removed scene");
        Ok(removed)
    }

    /// Move the scene at `from_index` to `to_index` and renumber.
    ///
    /// Both arguments are positions, not identities.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::IndexOutOfRange`] if either index is not a valid
    /// position in the current sequence; the collection is left unchanged.
    pub fn reorder(&mut self, from_index: usize, to_index: usize) -> SceneResult<()> {
        let len = self.scenes.len();
        if from_index >= len || to_index >= len {
            return Err(SceneError::IndexOutOfRange {
                from: from_index,
                to: to_index,
                len,
            });
        }
        let scene = self.scenes.remove(from_index);
        self.scenes.insert(to_index, scene);
        self.renumber();
        debug!(from_index, to_index, "Reordered scenes");
        Ok(())
    }

    /// Find a scene by identity.
    pub fn get(&self, scene_id: &str) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.id == scene_id)
    }

    /// Zero-based position of the scene with identity `scene_id`.
    pub fn position(&self, scene_id: &str) -> Option<usize> {
        self.scenes.iter().position(|s| s.id == scene_id)
    }

    pub fn as_slice(&self) -> &[Scene] {
        &self.scenes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Scene> {
        self.scenes.iter()
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Whether every scene has a non-blank script. Vacuously true when empty.
    pub fn all_scripted(&self) -> bool {
        self.scenes.iter().all(Scene::has_script)
    }

    fn renumber(&mut self) {
        for (index, scene) in self.scenes.iter_mut().enumerate() {
            scene.ordinal = ordinal_at(index);
        }
    }
}

/// 1-based ordinal for the scene at `index`, saturating at `u32::MAX`.
fn ordinal_at(index: usize) -> u32 {
    u32::try_from(index)
        .ok()
        .and_then(|i| i.checked_add(1))
        .unwrap_or(u32::MAX)
}

impl<'a> IntoIterator for &'a SceneCollection {
    type Item = &'a Scene;
    type IntoIter = std::slice::Iter<'a, Scene>;

    fn into_iter(self) -> Self::IntoIter {
        self.scenes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::id::SequentialIdGenerator;

    fn assert_ordinals(collection: &SceneCollection) {
        for (index, scene) in collection.iter().enumerate() {
            assert_eq!(scene.ordinal as usize, index + 1, "scene {}", scene.id);
        }
    }

    fn ids_of(collection: &SceneCollection) -> Vec<&str> {
        collection.iter().map(|s| s.id.as_str()).collect()
    }

    fn collection_of(n: usize) -> SceneCollection {
        let ids = SequentialIdGenerator::new("s");
        let mut collection = SceneCollection::new();
        for i in 0..n {
            collection.add(&ids, NewScene::with_script(format!("scene {i}")));
        }
        collection
    }

    #[test]
    fn test_add_assigns_identity_and_ordinal() {
        let ids = SequentialIdGenerator::new("s");
        let mut collection = SceneCollection::new();

        let first = collection.add(&ids, NewScene::default()).clone();
        let second = collection.add(&ids, NewScene::with_script("two")).clone();

        assert_eq!(first.id, "s1");
        assert_eq!(first.ordinal, 1);
        assert_eq!(second.id, "s2");
        assert_eq!(second.ordinal, 2);
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn test_remove_renumbers_remaining() {
        let mut collection = collection_of(3);

        let removed = collection.remove("s2").unwrap();

        assert_eq!(removed.id, "s2");
        assert_eq!(ids_of(&collection), vec!["s1", "s3"]);
        assert_ordinals(&collection);
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut collection = collection_of(2);
        let before = collection.clone();

        let result = collection.remove("missing");

        assert_eq!(result, Err(SceneError::NotFound("missing".to_string())));
        assert_eq!(collection, before);
    }

    #[test]
    fn test_reorder_moves_first_to_last() {
        let mut collection = collection_of(3);

        collection.reorder(0, 2).unwrap();

        assert_eq!(ids_of(&collection), vec!["s2", "s3", "s1"]);
        assert_ordinals(&collection);
    }

    #[test]
    fn test_reorder_moves_last_to_first() {
        let mut collection = collection_of(4);

        collection.reorder(3, 0).unwrap();

        assert_eq!(ids_of(&collection), vec!["s4", "s1", "s2", "s3"]);
        assert_ordinals(&collection);
    }

    #[test]
    fn test_reorder_out_of_range_is_noop() {
        let mut collection = collection_of(3);
        let before = collection.clone();

        assert_eq!(
            collection.reorder(0, 3),
            Err(SceneError::IndexOutOfRange {
                from: 0,
                to: 3,
                len: 3
            })
        );
        assert!(collection.reorder(5, 0).is_err());
        assert!(SceneCollection::new().reorder(0, 0).is_err());
        assert_eq!(collection, before);
    }

    #[test]
    fn test_update_keeps_identity_and_position() {
        let mut collection = collection_of(3);

        let updated = collection
            .update("s2", ScenePatch::script("rewritten"))
            .unwrap()
            .clone();

        assert_eq!(updated.id, "s2");
        assert_eq!(updated.ordinal, 2);
        assert_eq!(updated.script, "rewritten");
        assert_eq!(collection.get("s1").unwrap().script, "scene 0");
        assert_eq!(collection.get("s3").unwrap().script, "scene 2");
    }

    #[test]
    fn test_update_unknown_reports_not_found() {
        let mut collection = collection_of(1);
        assert!(matches!(
            collection.update("nope", ScenePatch::script("x")),
            Err(SceneError::NotFound(_))
        ));
    }

    #[test]
    fn test_ordinals_hold_across_mixed_operations() {
        let ids = SequentialIdGenerator::new("s");
        let mut collection = SceneCollection::new();

        for step in 0..40usize {
            match step % 5 {
                0 | 1 => {
                    collection.add(&ids, NewScene::default());
                }
                2 => {
                    let len = collection.len();
                    if len > 1 {
                        let _ = collection.reorder(step % len, (step * 7) % len);
                    }
                }
                3 => {
                    if let Some(id) = collection.as_slice().first().map(|s| s.id.clone()) {
                        let _ = collection.remove(&id);
                    }
                }
                _ => {
                    let _ = collection.reorder(collection.len(), 0);
                }
            }
            assert_ordinals(&collection);
        }
    }

    #[test]
    fn test_ordinal_at_saturates() {
        assert_eq!(ordinal_at(0), 1);
        assert_eq!(ordinal_at(41), 42);
        assert_eq!(ordinal_at(u32::MAX as usize), u32::MAX);
    }

    #[test]
    fn test_from_scenes_rederives_ordinals() {
        let scenes = vec![
            NewScene::default().into_scene("b".to_string(), 7),
            NewScene::default().into_scene("a".to_string(), 7),
        ];

        let collection = SceneCollection::from_scenes(scenes);

        assert_eq!(ids_of(&collection), vec!["b", "a"]);
        assert_ordinals(&collection);
    }

    #[test]
    fn test_all_scripted() {
        let mut collection = collection_of(2);
        assert!(collection.all_scripted());

        collection.update("s1", ScenePatch::script("   ")).unwrap();
        assert!(!collection.all_scripted());
        assert!(SceneCollection::new().all_scripted());
    }
}
