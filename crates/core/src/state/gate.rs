//! Transition gates.
//!
//! Each stage has an admission predicate evaluated purely over the current
//! project fields. This table is the single source of truth for whether a
//! project may move forward.
//!
//! | Target stage    | Admission predicate                                          |
//! |-----------------|--------------------------------------------------------------|
//! | request         | always                                                       |
//! | decompose       | brief description is not blank                               |
//! | pre-production  | decomposition plan is present                                |
//! | approval        | at least one scene, avatar selected, voice selected          |
//! | generation      | every scene script is not blank                              |
//! | assembly        | ledger non-empty and every entry completed                   |
//! | post-production | final video reference is present                             |

use thiserror::Error;
use vp_protocol::generation_models::GenerationStatus;
use vp_protocol::stage_models::PipelineStage;

use crate::state::project::PipelineProject;

/// The first unmet requirement keeping a project out of a stage.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateBlocker {
    #[error("brief description is empty")]
    MissingDescription,

    #[error("no decomposition plan has been recorded")]
    MissingPlan,

    #[error("storyboard has no scenes")]
    NoScenes,

    #[error("no avatar selected")]
    NoAvatar,

    #[error("no voice selected")]
    NoVoice,

    #[error("{0} scene(s) have an empty script")]
    UnscriptedScenes(usize),

    #[error("no generation results recorded")]
    NoGenerationResults,

    #[error("{0} generation result(s) not completed")]
    IncompleteGeneration(usize),

    #[error("no final video has been assembled")]
    MissingFinalVideo,
}

/// Explain why `project` may not enter `stage`, or `None` if it may.
pub fn blocker(stage: PipelineStage, project: &PipelineProject) -> Option<GateBlocker> {
    match stage {
        PipelineStage::Request => None,
        PipelineStage::Decompose => {
            (!project.brief().has_description()).then_some(GateBlocker::MissingDescription)
        }
        PipelineStage::PreProduction => project
            .decomposition_plan()
            .is_none()
            .then_some(GateBlocker::MissingPlan),
        PipelineStage::Approval => {
            if project.scenes().is_empty() {
                Some(GateBlocker::NoScenes)
            } else if project.selected_avatar().is_none() {
                Some(GateBlocker::NoAvatar)
            } else if project.selected_voice().is_none() {
                Some(GateBlocker::NoVoice)
            } else {
                None
            }
        }
        PipelineStage::Generation => {
            let unscripted = project.scenes().iter().filter(|s| !s.has_script()).count();
            (unscripted > 0).then_some(GateBlocker::UnscriptedScenes(unscripted))
        }
        PipelineStage::Assembly => {
            let ledger = project.generation_results();
            if ledger.is_empty() {
                Some(GateBlocker::NoGenerationResults)
            } else {
                let incomplete = ledger.len() - ledger.count(GenerationStatus::Completed);
                (incomplete > 0).then_some(GateBlocker::IncompleteGeneration(incomplete))
            }
        }
        PipelineStage::PostProduction => project
            .final_video_url()
            .is_none()
            .then_some(GateBlocker::MissingFinalVideo),
    }
}

/// Whether `project` may enter `stage`. Pure: depends only on current fields.
pub fn can_advance_to(stage: PipelineStage, project: &PipelineProject) -> bool {
    blocker(stage, project).is_none()
}

/// Gate verdict for every stage, in pipeline order.
pub fn evaluate_all(project: &PipelineProject) -> Vec<(PipelineStage, Option<GateBlocker>)> {
    PipelineStage::ALL
        .iter()
        .map(|&stage| (stage, blocker(stage, project)))
        .collect()
}
