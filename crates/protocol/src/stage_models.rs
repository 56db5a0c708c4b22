//! Pipeline stage models.
//!
//! A project moves through seven ordered stages. The ordering is part of the
//! contract: gated advancement only ever targets the immediate successor.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use ts_rs::TS;

/// One of the seven ordered production stages.
///
/// The derived `Ord` follows declaration order, so
/// `Request < Decompose < ... < PostProduction`.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, TS,
)]
#[serde(rename_all = "kebab-case")]
pub enum PipelineStage {
    /// Capture the authoring brief.
    #[default]
    Request,

    /// Break the brief down into a structured plan.
    Decompose,

    /// Author scenes and pick avatar and voice.
    PreProduction,

    /// Review the storyboard before spending generation budget.
    Approval,

    /// Render every scene.
    Generation,

    /// Stitch rendered scenes into the final video.
    Assembly,

    /// Review and deliver the final video.
    PostProduction,
}

impl PipelineStage {
    /// Every stage in pipeline order.
    pub const ALL: [PipelineStage; 7] = [
        PipelineStage::Request,
        PipelineStage::Decompose,
        PipelineStage::PreProduction,
        PipelineStage::Approval,
        PipelineStage::Generation,
        PipelineStage::Assembly,
        PipelineStage::PostProduction,
    ];

    /// Zero-based position of this stage in [`PipelineStage::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// The stage immediately following this one, if any.
    pub fn next(self) -> Option<PipelineStage> {
        Self::ALL.get(self.index() + 1).copied()
    }

    /// The stage immediately preceding this one, if any.
    pub fn previous(self) -> Option<PipelineStage> {
        self.index().checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }

    /// Whether this is the last stage of the pipeline.
    pub fn is_last(self) -> bool {
        self.next().is_none()
    }

    /// Wire name, identical to the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Request => "request",
            Self::Decompose => "decompose",
            Self::PreProduction => "pre-production",
            Self::Approval => "approval",
            Self::Generation => "generation",
            Self::Assembly => "assembly",
            Self::PostProduction => "post-production",
        }
    }

    /// Human-readable label for the stage.
    pub fn label(self) -> &'static str {
        match self {
            Self::Request => "Request",
            Self::Decompose => "Decompose",
            Self::PreProduction => "Pre-Production",
            Self::Approval => "Approval",
            Self::Generation => "Generation",
            Self::Assembly => "Assembly",
            Self::PostProduction => "Post-Production",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a pipeline stage.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown pipeline stage '{0}'")]
pub struct ParseStageError(pub String);

impl FromStr for PipelineStage {
    type Err = ParseStageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| ParseStageError(s.to_string()))
    }
}
