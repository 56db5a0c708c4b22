//! Snapshot store backed by one pretty-printed JSON file per project.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};
use vp_protocol::project_models::{ProjectSnapshot, SnapshotSummary};
use walkdir::WalkDir;

use crate::persistence::base::{snapshot_key, sort_summaries, validate_project_id, SnapshotStore};
use crate::persistence::error::{SnapshotError, SnapshotResult};

/// Stores each snapshot at `<dir>/<project_id>.json`.
///
/// Writes go to a temporary file in the same directory which is then renamed
/// over the target, so readers never observe a half-written snapshot.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    dir: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the snapshot file for `project_id`.
    pub fn path_for(&self, project_id: &str) -> SnapshotResult<PathBuf> {
        validate_project_id(project_id)?;
        Ok(self.dir.join(format!("{project_id}.json")))
    }

    async fn read_snapshot(path: &Path) -> SnapshotResult<ProjectSnapshot> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| SnapshotError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        serde_json::from_str(&content).map_err(|source| SnapshotError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn snapshot_files(&self) -> SnapshotResult<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|source| SnapshotError::DirectoryWalk {
                path: self.dir.clone(),
                source,
            })?;
            let path = entry.path();
            if entry.file_type().is_file()
                && path.extension().and_then(|s| s.to_str()) == Some("json")
            {
                files.push(path.to_path_buf());
            }
        }
        Ok(files)
    }
}

#[async_trait]
impl SnapshotStore for FileSnapshotStore {
    async fn save(&self, snapshot: &ProjectSnapshot) -> SnapshotResult<()> {
        let project_id = snapshot_key(snapshot)?;
        let path = self.path_for(project_id)?;
        let bytes = serde_json::to_vec_pretty(snapshot).map_err(SnapshotError::Serialize)?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| SnapshotError::Io {
                path: self.dir.clone(),
                source,
            })?;

        let dir = self.dir.clone();
        let target = path.clone();
        tokio::task::spawn_blocking(move || write_atomically(&dir, &target, &bytes))
            .await
            .map_err(|e| SnapshotError::Task(e.to_string()))??;

        info!(project_id, path = %path.display(), "Saved project snapshot");
        Ok(())
    }

    async fn load(&self, project_id: &str) -> SnapshotResult<ProjectSnapshot> {
        let path = self.path_for(project_id)?;
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Err(SnapshotError::NotFound(project_id.to_string()));
        }
        let snapshot = Self::read_snapshot(&path).await?;
        debug!(project_id, "Loaded project snapshot");
        Ok(snapshot)
    }

    async fn list(&self) -> SnapshotResult<Vec<SnapshotSummary>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut summaries = Vec::new();
        for path in self.snapshot_files()? {
            let Some(project_id) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let snapshot = match Self::read_snapshot(&path).await {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping unreadable snapshot");
                    continue;
                }
            };
            let saved_at: DateTime<Utc> = tokio::fs::metadata(&path)
                .await
                .and_then(|m| m.modified())
                .map(DateTime::<Utc>::from)
                .unwrap_or_else(|_| Utc::now());
            summaries.push(SnapshotSummary::of(
                project_id.to_string(),
                &snapshot,
                saved_at,
            ));
        }

        sort_summaries(&mut summaries);
        Ok(summaries)
    }

    async fn delete(&self, project_id: &str) -> SnapshotResult<()> {
        let path = self.path_for(project_id)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                info!(project_id, "Deleted project snapshot");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(SnapshotError::NotFound(project_id.to_string()))
            }
            Err(source) => Err(SnapshotError::Io { path, source }),
        }
    }
}

fn write_atomically(dir: &Path, target: &Path, bytes: &[u8]) -> SnapshotResult<()> {
    let io_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source: std::io::Error| SnapshotError::Io { path, source }
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(io_err(dir))?;
    tmp.write_all(bytes).map_err(io_err(tmp.path()))?;
    tmp.as_file().sync_all().map_err(io_err(tmp.path()))?;
    tmp.persist(target).map_err(|e| SnapshotError::Io {
        path: target.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}
