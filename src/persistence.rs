use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncReadExt;
use tracing::{debug, info};

use crate::store::{AppState, StateListener};

/// Format version written into every snapshot file
pub const SNAPSHOT_VERSION: &str = "1.0.0";

/// Errors that can occur while saving or loading snapshots
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: String, found: String },
}

/// On-disk envelope around a state snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSnapshot {
    pub version: String,
    pub saved_at: DateTime<Utc>,
    pub state: AppState,
}

impl PersistedSnapshot {
    pub fn new(state: AppState) -> Self {
        Self {
            version: SNAPSHOT_VERSION.to_string(),
            saved_at: Utc::now(),
            state,
        }
    }

    fn check_version(&self) -> Result<(), PersistenceError> {
        if major(&self.version) != major(SNAPSHOT_VERSION) {
            return Err(PersistenceError::VersionMismatch {
                expected: SNAPSHOT_VERSION.to_string(),
                found: self.version.clone(),
            });
        }
        Ok(())
    }
}

fn major(version: &str) -> &str {
    version.split('.').next().unwrap_or(version)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistenceConfig {
    pub enabled: bool,
    pub state_file: PathBuf,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            state_file: PathBuf::from(".refurb-tracker/state.json"),
        }
    }
}

/// Bridge between the in-memory store and durable storage
#[async_trait]
pub trait StatePersistence: Send + Sync {
    /// Write the snapshot, replacing any earlier one
    async fn save_snapshot(&self, state: &AppState) -> Result<(), PersistenceError>;

    /// Read the last saved snapshot, `None` if there is none
    async fn load_snapshot(&self) -> Result<Option<AppState>, PersistenceError>;
}

#[derive(Debug, Clone)]
pub struct FileSystemPersistence {
    config: PersistenceConfig,
}

impl FileSystemPersistence {
    pub fn new(config: PersistenceConfig) -> Self {
        Self { config }
    }

    pub fn state_file(&self) -> &PathBuf {
        &self.config.state_file
    }

    async fn ensure_parent_dir(&self) -> Result<(), PersistenceError> {
        if let Some(parent) = self.config.state_file.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl StatePersistence for FileSystemPersistence {
    async fn save_snapshot(&self, state: &AppState) -> Result<(), PersistenceError> {
        if !self.config.enabled {
            debug!("Persistence disabled, snapshot not saved");
            return Ok(());
        }

        self.ensure_parent_dir().await?;

        let snapshot = PersistedSnapshot::new(state.clone());
        let serialized = serde_json::to_string_pretty(&snapshot)?;

        // Write to temporary file first, then rename
        let state_file = &self.config.state_file;
        let temp_file = format!("{}.tmp", state_file.display());
        fs::write(&temp_file, serialized).await?;
        fs::rename(&temp_file, state_file).await?;

        info!(
            file = ?state_file,
            devices = state.devices.len(),
            reviews = state.reviews.len(),
            "Snapshot saved"
        );
        Ok(())
    }

    async fn load_snapshot(&self) -> Result<Option<AppState>, PersistenceError> {
        if !self.config.enabled {
            return Ok(None);
        }

        let state_file = &self.config.state_file;
        if !fs::try_exists(state_file).await? {
            info!(file = ?state_file, "No existing snapshot found");
            return Ok(None);
        }

        let mut file = fs::File::open(state_file).await?;
        let mut contents = String::new();
        file.read_to_string(&mut contents).await?;

        let snapshot: PersistedSnapshot = serde_json::from_str(&contents)?;
        snapshot.check_version()?;

        info!(
            file = ?state_file,
            version = %snapshot.version,
            saved_at = %snapshot.saved_at,
            "Snapshot loaded"
        );
        Ok(Some(snapshot.state))
    }
}

/// Store listener that holds the newest unsaved snapshot until it is taken
/// for writing. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct SnapshotTracker {
    pending: Arc<Mutex<Option<AppState>>>,
}

impl SnapshotTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// The latest snapshot seen since the last take, if any
    pub fn take(&self) -> Option<AppState> {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    pub fn is_dirty(&self) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl StateListener for SnapshotTracker {
    fn state_changed(&self, state: &AppState) {
        debug!(devices = state.devices.len(), "Snapshot marked for saving");
        *self.pending.lock().unwrap_or_else(PoisonError::into_inner) = Some(state.clone());
    }
}
