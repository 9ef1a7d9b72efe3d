//! Whole-state snapshots saved after every store mutation.

use crate::models::{Complaint, User};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

pub const SNAPSHOT_FILE_NAME: &str = "snapshot.json";

/// Everything the store needs to come back after a restart.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    pub users: Vec<User>,
    pub complaints: Vec<Complaint>,
    /// Sequence number handed to the next complaint's task key.
    #[serde(default = "default_next_task_seq")]
    pub next_task_seq: u64,
}

const fn default_next_task_seq() -> u64 {
    1
}

impl Snapshot {
    pub fn empty() -> Self {
        Self {
            users: Vec::new(),
            complaints: Vec::new(),
            next_task_seq: default_next_task_seq(),
        }
    }
}

/// Load/save boundary. Saving overwrites the previous snapshot wholesale.
pub trait SnapshotPersistence: Send {
    fn load(&self) -> Result<Option<Snapshot>>;
    fn save(&self, snapshot: &Snapshot) -> Result<()>;
}

/// Pretty-printed JSON file. Identical consecutive snapshots are written once.
pub struct JsonSnapshotFile {
    path: PathBuf,
    last_hash: Mutex<Option<String>>,
}

impl JsonSnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            last_hash: Mutex::new(None),
        }
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(SNAPSHOT_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn last_hash(&self) -> MutexGuard<'_, Option<String>> {
        self.last_hash
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SnapshotPersistence for JsonSnapshotFile {
    fn load(&self) -> Result<Option<Snapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let data = fs::read(&self.path)
            .with_context(|| format!("Failed reading snapshot {}", self.path.display()))?;
        let snapshot: Snapshot = serde_json::from_slice(&data)
            .with_context(|| format!("Failed parsing snapshot {}", self.path.display()))?;
        *self.last_hash() = Some(compute_hash(&data));
        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let payload = serde_json::to_vec_pretty(snapshot)
            .with_context(|| format!("Failed serializing snapshot {}", self.path.display()))?;
        let hash = compute_hash(&payload);
        if self.last_hash().as_deref() == Some(hash.as_str()) && self.path.exists() {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed creating snapshot directory {:?}", parent))?;
        }
        let staging = self.path.with_extension("json.tmp");
        let mut file = fs::File::create(&staging)
            .with_context(|| format!("Failed opening snapshot {}", staging.display()))?;
        file.write_all(&payload)?;
        file.sync_all()?;
        fs::rename(&staging, &self.path)
            .with_context(|| format!("Failed replacing snapshot {}", self.path.display()))?;
        *self.last_hash() = Some(hash);
        Ok(())
    }
}

/// In-process snapshot slot, mostly for tests and ephemeral stores.
#[derive(Default)]
pub struct MemorySnapshot {
    slot: Mutex<Option<Snapshot>>,
    saves: Mutex<usize>,
}

impl MemorySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(snapshot: Snapshot) -> Self {
        Self {
            slot: Mutex::new(Some(snapshot)),
            saves: Mutex::new(0),
        }
    }

    pub fn latest(&self) -> Option<Snapshot> {
        self.slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        *self
            .saves
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SnapshotPersistence for MemorySnapshot {
    fn load(&self) -> Result<Option<Snapshot>> {
        Ok(self.latest())
    }

    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        *self
            .slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(snapshot.clone());
        *self
            .saves
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) += 1;
        Ok(())
    }
}

impl<T: SnapshotPersistence + Sync> SnapshotPersistence for std::sync::Arc<T> {
    fn load(&self) -> Result<Option<Snapshot>> {
        (**self).load()
    }

    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        (**self).save(snapshot)
    }
}

fn compute_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
