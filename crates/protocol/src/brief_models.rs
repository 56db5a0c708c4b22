//! Authoring brief models.
//!
//! The brief captures what the requester wants produced. It is free-form and
//! only its description takes part in gating.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Free-form authoring intent for a video project.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, TS)]
#[serde(rename_all = "camelCase")]
pub struct Brief {
    /// What the video should be about.
    #[serde(default)]
    pub description: String,

    /// Target video type (e.g. "explainer", "product-demo").
    #[serde(default)]
    pub video_type: String,

    /// Target distribution platform (e.g. "youtube", "linkedin").
    #[serde(default)]
    pub platform: String,

    /// Target duration in seconds.
    #[serde(default)]
    pub duration_secs: u32,

    /// Aspect ratio such as "16:9" or "9:16".
    #[serde(default)]
    pub aspect_ratio: String,

    /// Output resolution such as "1080p".
    #[serde(default)]
    pub resolution: String,
}

impl Brief {
    /// Whether the description contains anything besides whitespace.
    pub fn has_description(&self) -> bool {
        !self.description.trim().is_empty()
    }

    /// Merge every field present in `patch` into this brief.
    pub fn merge(&mut self, patch: BriefPatch) {
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(video_type) = patch.video_type {
            self.video_type = video_type;
        }
        if let Some(platform) = patch.platform {
            self.platform = platform;
        }
        if let Some(duration_secs) = patch.duration_secs {
            self.duration_secs = duration_secs;
        }
        if let Some(aspect_ratio) = patch.aspect_ratio {
            self.aspect_ratio = aspect_ratio;
        }
        if let Some(resolution) = patch.resolution {
            self.resolution = resolution;
        }
    }
}

/// Partial update for a [`Brief`]. Absent fields are left untouched.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, TS)]
#[serde(rename_all = "camelCase")]
pub struct BriefPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
}

impl BriefPatch {
    /// Patch that only sets the description.
    pub fn description(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..Self::default()
        }
    }

    /// Whether the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_only_touches_present_fields() {
        let mut brief = Brief {
            description: "launch teaser".to_string(),
            platform: "youtube".to_string(),
            duration_secs: 30,
            ..Brief::default()
        };

        brief.merge(BriefPatch {
            platform: Some("tiktok".to_string()),
            aspect_ratio: Some("9:16".to_string()),
            ..BriefPatch::default()
        });

        assert_eq!(brief.description, "launch teaser");
        assert_eq!(brief.platform, "tiktok");
        assert_eq!(brief.aspect_ratio, "9:16");
        assert_eq!(brief.duration_secs, 30);
    }

    #[test]
    fn test_has_description_ignores_whitespace() {
        let mut brief = Brief::default();
        assert!(!brief.has_description());

        brief.merge(BriefPatch::description("  \n\t "));
        assert!(!brief.has_description());

        brief.merge(BriefPatch::description("demo video"));
        assert!(brief.has_description());
    }

    #[test]
    fn test_empty_patch() {
        assert!(BriefPatch::default().is_empty());
        assert!(!BriefPatch::description("x").is_empty());
    }
}
