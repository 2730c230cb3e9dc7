//! Snapshot persistence for per-fund state

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{MonitorError, Result};
use crate::models::StateMap;

#[async_trait]
pub trait StateStore: Send + Sync {
    /// Last saved snapshot; an empty map when nothing was saved yet
    async fn load(&self) -> Result<StateMap>;

    async fn save(&self, state: &StateMap) -> Result<()>;
}

/// Pretty-printed JSON file, replaced atomically on every save
pub struct JsonStateStore {
    path: PathBuf,
}

impl JsonStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl StateStore for JsonStateStore {
    async fn load(&self) -> Result<StateMap> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No state file yet, starting fresh");
                return Ok(StateMap::new());
            }
            Err(e) => {
                return Err(MonitorError::StateIO(format!(
                    "failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        serde_json::from_str(&raw).map_err(|e| {
            MonitorError::StateIO(format!("failed to parse {}: {}", self.path.display(), e))
        })
    }

    async fn save(&self, state: &StateMap) -> Result<()> {
        let json = serde_json::to_string_pretty(state)
            .map_err(|e| MonitorError::StateIO(format!("failed to serialize state: {}", e)))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                MonitorError::StateIO(format!("failed to create {}: {}", parent.display(), e))
            })?;
        }

        let temp = self.temp_path();
        tokio::fs::write(&temp, json).await.map_err(|e| {
            MonitorError::StateIO(format!("failed to write {}: {}", temp.display(), e))
        })?;
        tokio::fs::rename(&temp, &self.path).await.map_err(|e| {
            MonitorError::StateIO(format!(
                "failed to move {} into place: {}",
                temp.display(),
                e
            ))
        })?;

        debug!(path = %self.path.display(), funds = state.len(), "State saved");
        Ok(())
    }
}
