//! Per-scene generation outcome models.
//!
//! Results reference scenes by identity rather than position: renders finish
//! in arbitrary order and the storyboard may be reordered while they run.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

/// Lifecycle status of a single scene render.
///
/// Pending -> Processing -> Completed | Failed
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, TS)]
#[serde(rename_all = "lowercase")]
pub enum GenerationStatus {
    /// Queued but not yet picked up by a renderer.
    #[default]
    Pending,

    /// A renderer is working on the scene.
    Processing,

    /// Render finished and produced an output reference.
    Completed,

    /// Render failed. The entry stays failed until the caller replaces it.
    Failed,
}

impl GenerationStatus {
    /// Wire name, identical to the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Whether no further updates are expected from the renderer.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl fmt::Display for GenerationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of generating one scene.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    /// Identity of the scene this result belongs to.
    pub scene_id: String,

    /// Current render status.
    pub status: GenerationStatus,

    /// Reference to the rendered clip once completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_url: Option<String>,

    /// Renderer error message when failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerationResult {
    /// A freshly queued result for `scene_id`.
    pub fn pending(scene_id: impl Into<String>) -> Self {
        Self {
            scene_id: scene_id.into(),
            status: GenerationStatus::Pending,
            output_url: None,
            error: None,
        }
    }

    /// Merge every field present in `patch`. The scene identity never changes.
    ///
    /// Moving to `Completed` drops a stale error and moving to `Failed` drops a
    /// stale output reference, so a retried render never carries both.
    pub fn merge(&mut self, patch: GenerationResultPatch) {
        if let Some(status) = patch.status {
            self.status = status;
            match status {
                GenerationStatus::Completed => self.error = None,
                GenerationStatus::Failed => self.output_url = None,
                GenerationStatus::Pending | GenerationStatus::Processing => {}
            }
        }
        if let Some(output_url) = patch.output_url {
            self.output_url = Some(output_url);
        }
        if let Some(error) = patch.error {
            self.error = Some(error);
        }
    }
}

/// Partial update for a [`GenerationResult`].
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, TS)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResultPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<GenerationStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerationResultPatch {
    /// Patch that only moves the status.
    pub fn status(status: GenerationStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Patch marking the render completed with its output reference.
    pub fn completed(output_url: impl Into<String>) -> Self {
        Self {
            status: Some(GenerationStatus::Completed),
            output_url: Some(output_url.into()),
            error: None,
        }
    }

    /// Patch marking the render failed with an error message.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            status: Some(GenerationStatus::Failed),
            output_url: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_completed() {
        let mut result = GenerationResult::pending("s1");
        result.merge(GenerationResultPatch::status(GenerationStatus::Processing));
        assert_eq!(result.status, GenerationStatus::Processing);
        assert_eq!(result.output_url, None);

        result.merge(GenerationResultPatch::completed("https://cdn.example/s1.mp4"));
        assert_eq!(result.scene_id, "s1");
        assert_eq!(result.status, GenerationStatus::Completed);
        assert_eq!(result.output_url.as_deref(), Some("https://cdn.example/s1.mp4"));
    }

    #[test]
    fn test_merge_retry_clears_stale_fields() {
        let mut result = GenerationResult::pending("s1");
        result.merge(GenerationResultPatch::completed("s1-first.mp4"));
        result.merge(GenerationResultPatch::failed("boom"));
        assert_eq!(result.status, GenerationStatus::Failed);
        assert_eq!(result.output_url, None);
        assert_eq!(result.error.as_deref(), Some("boom"));

        result.merge(GenerationResultPatch::completed("s1.mp4"));
        assert_eq!(result.status, GenerationStatus::Completed);
        assert_eq!(result.output_url.as_deref(), Some("s1.mp4"));
        assert_eq!(result.error, None);
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!GenerationStatus::Pending.is_terminal());
        assert!(!GenerationStatus::Processing.is_terminal());
        assert!(GenerationStatus::Completed.is_terminal());
        assert!(GenerationStatus::Failed.is_terminal());
    }
}
