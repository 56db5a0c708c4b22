//! In-memory snapshot store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::Mutex;
use vp_protocol::project_models::{ProjectSnapshot, SnapshotSummary};

use crate::persistence::base::{snapshot_key, sort_summaries, SnapshotStore};
use crate::persistence::error::{SnapshotError, SnapshotResult};

/// Keeps snapshots in a map for the lifetime of the store. Used by tests and
/// embedders that persist elsewhere.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    snapshots: Mutex<HashMap<String, (ProjectSnapshot, DateTime<Utc>)>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.snapshots.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.snapshots.lock().await.is_empty()
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn save(&self, snapshot: &ProjectSnapshot) -> SnapshotResult<()> {
        let project_id = snapshot_key(snapshot)?.to_string();
        self.snapshots
            .lock()
            .await
            .insert(project_id, (snapshot.clone(), Utc::now()));
        Ok(())
    }

    async fn load(&self, project_id: &str) -> SnapshotResult<ProjectSnapshot> {
        self.snapshots
            .lock()
            .await
            .get(project_id)
            .map(|(snapshot, _)| snapshot.clone())
            .ok_or_else(|| SnapshotError::NotFound(project_id.to_string()))
    }

    async fn list(&self) -> SnapshotResult<Vec<SnapshotSummary>> {
        let mut summaries: Vec<_> = self
            .snapshots
            .lock()
            .await
            .iter()
            .map(|(id, (snapshot, saved_at))| SnapshotSummary::of(id.clone(), snapshot, *saved_at))
            .collect();
        sort_summaries(&mut summaries);
        Ok(summaries)
    }

    async fn delete(&self, project_id: &str) -> SnapshotResult<()> {
        self.snapshots
            .lock()
            .await
            .remove(project_id)
            .map(|_| ())
            .ok_or_else(|| SnapshotError::NotFound(project_id.to_string()))
    }
}
