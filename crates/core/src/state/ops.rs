//! Applying protocol operations to a [`PipelineStore`].

use tracing::warn;
use vp_protocol::ipc::{Event, Op};

use crate::state::project::PipelineStore;

impl PipelineStore {
    /// Apply one operation and describe its outcome.
    ///
    /// Caller misuse (unknown scene, out-of-range index) yields
    /// [`Event::Rejected`] with the project unchanged. A refused advance
    /// yields [`Event::AdvanceBlocked`].
    pub fn apply(&mut self, op: Op) -> Event {
        match op {
            Op::SetProjectId { project_id } => {
                self.set_project_id(project_id);
                Event::Updated
            }
            Op::SetProjectName { name } => {
                self.set_project_name(name);
                Event::Updated
            }
            Op::SetBrief { patch } => {
                self.set_brief(patch);
                Event::Updated
            }
            Op::SetDecompositionPlan { plan } => {
                self.set_decomposition_plan(plan);
                Event::Updated
            }
            Op::AddScene { scene } => Event::SceneAdded {
                scene: self.add_scene(scene).clone(),
            },
            Op::UpdateScene { scene_id, patch } => match self.update_scene(&scene_id, patch) {
                Ok(_) => self.scenes_changed(),
                Err(e) => rejected(e.to_string()),
            },
            Op::RemoveScene { scene_id } => match self.remove_scene(&scene_id) {
                Ok(_) => self.scenes_changed(),
                Err(e) => rejected(e.to_string()),
            },
            Op::ReorderScenes {
                from_index,
                to_index,
            } => match self.reorder_scenes(from_index, to_index) {
                Ok(()) => self.scenes_changed(),
                Err(e) => rejected(e.to_string()),
            },
            Op::SetAvatar { avatar_id } => {
                self.set_avatar(avatar_id);
                Event::Updated
            }
            Op::SetVoice { voice_id } => {
                self.set_voice(voice_id);
                Event::Updated
            }
            Op::SetTransitionType { transition } => {
                self.set_transition_type(transition);
                Event::Updated
            }
            Op::SetGenerationResults { results } => {
                self.set_generation_results(results);
                Event::Updated
            }
            Op::UpdateGenerationResult { scene_id, patch } => {
                match self.update_generation_result(&scene_id, patch) {
                    Ok(result) => Event::GenerationResultUpdated {
                        scene_id: result.scene_id.clone(),
                        status: result.status,
                    },
                    Err(e) => rejected(e.to_string()),
                }
            }
            Op::SetFinalVideoUrl { url } => {
                self.set_final_video_url(url);
                Event::Updated
            }
            Op::SetGenerating { value } => {
                self.set_generating(value);
                Event::Updated
            }
            Op::SetAssembling { value } => {
                self.set_assembling(value);
                Event::Updated
            }
            Op::SetCurrentStep { step } => {
                let from = self.current_step();
                self.set_current_step(step);
                Event::StepChanged { from, to: step }
            }
            Op::AdvanceStep => {
                let from = self.current_step();
                let target = from.next();
                if self.advance_step() {
                    Event::StepChanged {
                        from,
                        to: self.current_step(),
                    }
                } else {
                    let reason = match target {
                        Some(stage) => self
                            .blocker(stage)
                            .map(|b| b.to_string())
                            .unwrap_or_default(),
                        None => format!("{from} is the last stage"),
                    };
                    Event::AdvanceBlocked { target, reason }
                }
            }
            Op::GoBack => {
                let from = self.current_step();
                if self.go_back() {
                    Event::StepChanged {
                        from,
                        to: self.current_step(),
                    }
                } else {
                    rejected(format!("{from} is the first stage"))
                }
            }
            Op::Reset => {
                self.reset();
                Event::ProjectReset
            }
            Op::LoadProject { snapshot } => {
                let project_id = snapshot.project_id.clone();
                self.load_project(snapshot);
                Event::ProjectLoaded { project_id }
            }
        }
    }

    fn scenes_changed(&self) -> Event {
        Event::ScenesChanged {
            scene_count: self.project().scenes().len(),
        }
    }
}

fn rejected(reason: String) -> Event {
    warn!(%reason, "Operation rejected");
    Event::Rejected { reason }
}

#[cfg(test)]
mod tests {
    use crate::state::id::SequentialIdGenerator;
    use crate::state::project::PipelineStore;
    use std::sync::Arc;
    use vp_protocol::brief_models::BriefPatch;
    use vp_protocol::generation_models::{GenerationResult, GenerationResultPatch, GenerationStatus};
    use vp_protocol::ipc::{Event, Op};
    use vp_protocol::scene_models::NewScene;
    use vp_protocol::stage_models::PipelineStage;

    fn store() -> PipelineStore {
        PipelineStore::with_id_generator(Arc::new(SequentialIdGenerator::new("s")))
    }

    #[test]
    fn test_add_scene_reports_scene() {
        let mut store = store();
        let event = store.apply(Op::AddScene {
            scene: NewScene::with_script("Intro"),
        });

        match event {
            Event::SceneAdded { scene } => {
                assert_eq!(scene.id, "s1");
                assert_eq!(scene.ordinal, 1);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_misuse_is_rejected_without_change() {
        let mut store = store();
        store.apply(Op::AddScene {
            scene: NewScene::default(),
        });
        let before = store.snapshot();

        let events = [
            store.apply(Op::RemoveScene {
                scene_id: "missing".to_string(),
            }),
            store.apply(Op::ReorderScenes {
                from_index: 0,
                to_index: 4,
            }),
            store.apply(Op::UpdateGenerationResult {
                scene_id: "s1".to_string(),
                patch: GenerationResultPatch::completed("s1.mp4"),
            }),
            store.apply(Op::GoBack),
        ];

        for event in &events {
            assert!(matches!(event, Event::Rejected { .. }), "{event:?}");
            assert!(event.is_noop());
        }
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_advance_blocked_explains_reason() {
        let mut store = store();

        let event = store.apply(Op::AdvanceStep);

        assert_eq!(
            event,
            Event::AdvanceBlocked {
                target: Some(PipelineStage::Decompose),
                reason: "brief description is empty".to_string(),
            }
        );
    }

    #[test]
    fn test_advance_and_back_report_step_changes() {
        let mut store = store();
        store.apply(Op::SetBrief {
            patch: BriefPatch::description("demo"),
        });

        assert_eq!(
            store.apply(Op::AdvanceStep),
            Event::StepChanged {
                from: PipelineStage::Request,
                to: PipelineStage::Decompose,
            }
        );
        assert_eq!(
            store.apply(Op::GoBack),
            Event::StepChanged {
                from: PipelineStage::Decompose,
                to: PipelineStage::Request,
            }
        );
    }

    #[test]
    fn test_last_stage_advance_is_blocked() {
        let mut store = store();
        store.apply(Op::SetCurrentStep {
            step: PipelineStage::PostProduction,
        });

        let event = store.apply(Op::AdvanceStep);

        assert!(matches!(
            event,
            Event::AdvanceBlocked { target: None, .. }
        ));
        assert_eq!(store.current_step(), PipelineStage::PostProduction);
    }

    #[test]
    fn test_generation_result_update_reports_status() {
        let mut store = store();
        store.apply(Op::SetGenerationResults {
            results: vec![GenerationResult::pending("s1")],
        });

        let event = store.apply(Op::UpdateGenerationResult {
            scene_id: "s1".to_string(),
            patch: GenerationResultPatch::status(GenerationStatus::Processing),
        });

        assert_eq!(
            event,
            Event::GenerationResultUpdated {
                scene_id: "s1".to_string(),
                status: GenerationStatus::Processing,
            }
        );
    }

    #[test]
    fn test_load_and_reset() {
        let mut store = store();
        store.apply(Op::SetProjectId {
            project_id: Some("p1".to_string()),
        });
        let snapshot = store.snapshot();

        assert_eq!(store.apply(Op::Reset), Event::ProjectReset);
        assert_eq!(store.project().project_id(), None);

        assert_eq!(
            store.apply(Op::LoadProject { snapshot }),
            Event::ProjectLoaded {
                project_id: Some("p1".to_string())
            }
        );
        assert_eq!(store.project().project_id(), Some("p1"));
    }
}
