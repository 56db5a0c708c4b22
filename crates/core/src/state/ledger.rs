//! Generation result ledger.
//!
//! Entries are keyed by scene identity. Updates only ever touch the entry for
//! the reporting scene, so render reports may arrive in any order without
//! affecting each other. Entries whose scene has since been removed are kept
//! as orphans; nothing here garbage-collects them.

use tracing::debug;
use vp_protocol::generation_models::{GenerationResult, GenerationResultPatch, GenerationStatus};

use crate::state::error::{LedgerError, LedgerResult};
use crate::state::scenes::SceneCollection;

/// Per-scene generation outcomes of a project.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationLedger {
    results: Vec<GenerationResult>,
}

impl GenerationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every entry.
    ///
    /// If the same scene appears more than once the last entry wins and keeps
    /// the position of the first.
    pub fn set_all(&mut self, results: Vec<GenerationResult>) {
        let mut deduped: Vec<GenerationResult> = Vec::with_capacity(results.len());
        for result in results {
            match deduped.iter_mut().find(|r| r.scene_id == result.scene_id) {
                Some(existing) => *existing = result,
                None => deduped.push(result),
            }
        }
        debug!(entries = deduped.len(), "Replaced generation ledger");
        self.results = deduped;
    }

    /// Merge `patch` into the entry for `scene_id`, leaving every other entry
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] if the ledger has no entry for that
    /// scene; the ledger is left unchanged.
    pub fn update(
        &mut self,
        scene_id: &str,
        patch: GenerationResultPatch,
    ) -> LedgerResult<&GenerationResult> {
        let entry = self
            .results
            .iter_mut()
            .find(|r| r.scene_id == scene_id)
            .ok_or_else(|| LedgerError::NotFound(scene_id.to_string()))?;
        entry.merge(patch);
        debug!(scene_id, status = %entry.status, "Updated generation result");
        Ok(&*entry)
    }

    pub fn get(&self, scene_id: &str) -> Option<&GenerationResult> {
        self.results.iter().find(|r| r.scene_id == scene_id)
    }

    pub fn as_slice(&self) -> &[GenerationResult] {
        &self.results
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GenerationResult> {
        self.results.iter()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Non-empty and every entry completed.
    pub fn all_completed(&self) -> bool {
        !self.results.is_empty()
            && self
                .results
                .iter()
                .all(|r| r.status == GenerationStatus::Completed)
    }

    /// Number of entries currently at `status`.
    pub fn count(&self, status: GenerationStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }

    /// Entries whose scene no longer exists in `scenes`.
    pub fn orphans<'a>(&'a self, scenes: &SceneCollection) -> Vec<&'a GenerationResult> {
        self.results
            .iter()
            .filter(|r| scenes.get(&r.scene_id).is_none())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::id::SequentialIdGenerator;
    use vp_protocol::scene_models::NewScene;

    fn pending_ledger(ids: &[&str]) -> GenerationLedger {
        let mut ledger = GenerationLedger::new();
        ledger.set_all(ids.iter().map(|id| GenerationResult::pending(*id)).collect());
        ledger
    }

    #[test]
    fn test_update_touches_only_matching_entry() {
        let mut ledger = pending_ledger(&["s1", "s2", "s3"]);

        ledger
            .update("s2", GenerationResultPatch::completed("s2.mp4"))
            .unwrap();

        assert_eq!(ledger.get("s1").unwrap().status, GenerationStatus::Pending);
        assert_eq!(ledger.get("s2").unwrap().status, GenerationStatus::Completed);
        assert_eq!(ledger.get("s3").unwrap().status, GenerationStatus::Pending);
    }

    #[test]
    fn test_failed_then_completed_drops_error() {
        let mut ledger = pending_ledger(&["s1"]);

        ledger
            .update("s1", GenerationResultPatch::failed("boom"))
            .unwrap();
        let result = ledger
            .update("s1", GenerationResultPatch::completed("s1.mp4"))
            .unwrap();

        assert_eq!(result.status, GenerationStatus::Completed);
        assert_eq!(result.output_url.as_deref(), Some("s1.mp4"));
        assert_eq!(result.error, None);
        assert!(ledger.all_completed());
    }

    #[test]
    fn test_update_unknown_scene_is_noop() {
        let mut ledger = pending_ledger(&["s1"]);
        let before = ledger.clone();

        let result = ledger.update("s9", GenerationResultPatch::completed("x"));

        assert_eq!(result, Err(LedgerError::NotFound("s9".to_string())));
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_all_completed_requires_entries() {
        let mut ledger = GenerationLedger::new();
        assert!(!ledger.all_completed());

        ledger.set_all(vec![GenerationResult::pending("s1")]);
        assert!(!ledger.all_completed());

        ledger
            .update("s1", GenerationResultPatch::completed("s1.mp4"))
            .unwrap();
        assert!(ledger.all_completed());
    }

    #[test]
    fn test_failed_entry_blocks_completion() {
        let mut ledger = pending_ledger(&["s1", "s2"]);
        ledger
            .update("s1", GenerationResultPatch::completed("s1.mp4"))
            .unwrap();
        ledger
            .update("s2", GenerationResultPatch::failed("renderer timed out"))
            .unwrap();

        assert!(!ledger.all_completed());
        assert_eq!(ledger.count(GenerationStatus::Failed), 1);
        assert_eq!(
            ledger.get("s2").unwrap().error.as_deref(),
            Some("renderer timed out")
        );
    }

    #[test]
    fn test_set_all_dedupes_by_scene() {
        let mut ledger = GenerationLedger::new();
        let mut later = GenerationResult::pending("s1");
        later.status = GenerationStatus::Processing;

        ledger.set_all(vec![
            GenerationResult::pending("s1"),
            GenerationResult::pending("s2"),
            later,
        ]);

        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.as_slice()[0].scene_id, "s1");
        assert_eq!(ledger.as_slice()[0].status, GenerationStatus::Processing);
    }

    #[test]
    fn test_orphans_are_reported_not_removed() {
        let ids = SequentialIdGenerator::new("s");
        let mut scenes = SceneCollection::new();
        scenes.add(&ids, NewScene::default());
        scenes.add(&ids, NewScene::default());
        let mut ledger = pending_ledger(&["s1", "s2"]);

        scenes.remove("s1").unwrap();

        let orphans = ledger.orphans(&scenes);
        assert_eq!(orphans.len(), 1);
        assert_eq!(orphans[0].scene_id, "s1");
        assert_eq!(ledger.len(), 2);

        // Reports for the orphan are still accepted.
        assert!(ledger
            .update("s1", GenerationResultPatch::completed("late.mp4"))
            .is_ok());
    }

    #[test]
    fn test_updates_are_order_independent() {
        let patches = [
            ("s1", GenerationResultPatch::completed("s1.mp4")),
            ("s2", GenerationResultPatch::failed("boom")),
            ("s3", GenerationResultPatch::status(GenerationStatus::Processing)),
        ];
        let orders: [[usize; 3]; 6] = [
            [0, 1, 2],
            [0, 2, 1],
            [1, 0, 2],
            [1, 2, 0],
            [2, 0, 1],
            [2, 1, 0],
        ];

        let mut outcomes = Vec::new();
        for order in orders {
            let mut ledger = pending_ledger(&["s1", "s2", "s3"]);
            for i in order {
                let (scene_id, patch) = &patches[i];
                ledger.update(scene_id, patch.clone()).unwrap();
            }
            outcomes.push(ledger);
        }

        for outcome in &outcomes[1..] {
            assert_eq!(outcome, &outcomes[0]);
        }
    }
}
