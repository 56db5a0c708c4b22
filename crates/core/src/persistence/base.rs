//! Snapshot store trait.

use async_trait::async_trait;
use vp_protocol::project_models::{ProjectSnapshot, SnapshotSummary};

use crate::persistence::error::{SnapshotError, SnapshotResult};

/// Durable storage for project snapshots, keyed by project id.
///
/// Stores only see snapshots, never live projects, so transient progress
/// flags are never persisted.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Store `snapshot` under its project id, replacing any previous version.
    async fn save(&self, snapshot: &ProjectSnapshot) -> SnapshotResult<()>;

    async fn load(&self, project_id: &str) -> SnapshotResult<ProjectSnapshot>;

    /// Every stored project, most recently saved first.
    async fn list(&self) -> SnapshotResult<Vec<SnapshotSummary>>;

    async fn delete(&self, project_id: &str) -> SnapshotResult<()>;
}

/// The key `snapshot` is stored under.
pub fn snapshot_key(snapshot: &ProjectSnapshot) -> SnapshotResult<&str> {
    let id = snapshot
        .project_id
        .as_deref()
        .ok_or(SnapshotError::MissingProjectId)?;
    validate_project_id(id)?;
    Ok(id)
}

/// Reject ids that are empty or could address a path outside the store.
pub fn validate_project_id(project_id: &str) -> SnapshotResult<()> {
    let invalid = project_id.trim().is_empty()
        || project_id.starts_with('.')
        || project_id.contains(['/', '\\', '\0']);
    if invalid {
        return Err(SnapshotError::InvalidProjectId(project_id.to_string()));
    }
    Ok(())
}

/// Newest first, ties broken by id.
pub(crate) fn sort_summaries(summaries: &mut [SnapshotSummary]) {
    summaries.sort_by(|a, b| {
        b.saved_at
            .cmp(&a.saved_at)
            .then_with(|| a.project_id.cmp(&b.project_id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_key_requires_id() {
        let snapshot = ProjectSnapshot::default();
        assert!(matches!(
            snapshot_key(&snapshot),
            Err(SnapshotError::MissingProjectId)
        ));
    }

    #[test]
    fn test_validate_project_id() {
        assert!(validate_project_id("launch-video").is_ok());
        assert!(validate_project_id("0b5c2f1e-1111-4c4c-9d9d-000000000000").is_ok());

        for bad in ["", "  ", "../escape", "a/b", "a\\b", ".hidden"] {
            assert!(
                matches!(
                    validate_project_id(bad),
                    Err(SnapshotError::InvalidProjectId(_))
                ),
                "{bad:?} should be rejected"
            );
        }
    }
}
