//! Append-only JSONL trail of store events.

use crate::store::{StoreEvent, StoreObserver};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// One line of the activity log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityRecord {
    pub event_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub event: StoreEvent,
}

/// Wraps the log path for a workspace.
pub struct ActivityLog {
    events_path: PathBuf,
}

impl ActivityLog {
    pub fn new(events_path: impl Into<PathBuf>) -> Self {
        Self {
            events_path: events_path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.events_path
    }

    pub fn append(&self, event: &StoreEvent) -> Result<ActivityRecord> {
        let record = ActivityRecord {
            event_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event: event.clone(),
        };
        if let Some(parent) = self.events_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.events_path)
            .with_context(|| format!("Unable to open {:?}", self.events_path))?;
        file.write_all(serde_json::to_string(&record)?.as_bytes())?;
        file.write_all(b"\n")?;
        Ok(record)
    }

    pub fn load_events(&self) -> Result<Vec<ActivityRecord>> {
        if !self.events_path.exists() {
            return Ok(Vec::new());
        }
        let data = fs::read_to_string(&self.events_path)
            .with_context(|| format!("Unable to read {:?}", self.events_path))?;
        let mut records = Vec::new();
        for line in data.lines().filter(|l| !l.trim().is_empty()) {
            let record: ActivityRecord = serde_json::from_str(line)
                .with_context(|| "Failed to parse activity record")?;
            records.push(record);
        }
        Ok(records)
    }

    pub fn load_events_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<ActivityRecord>> {
        Ok(self
            .load_events()?
            .into_iter()
            .filter(|record| record.timestamp >= cutoff)
            .collect())
    }

    /// Events that touched a single complaint, oldest first.
    pub fn complaint_trail(&self, complaint_id: &Uuid) -> Result<Vec<ActivityRecord>> {
        Ok(self
            .load_events()?
            .into_iter()
            .filter(|record| record.event.complaint_id().as_ref() == Some(complaint_id))
            .collect())
    }
}

impl StoreObserver for ActivityLog {
    fn on_event(&self, event: &StoreEvent) {
        // The trail is advisory; a full disk must not fail the mutation.
        let _ = self.append(event);
    }
}
