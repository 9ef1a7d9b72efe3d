//! Configuration primitives for ComplaintDesk.
//!
//! Stored as TOML at `<workspace>/config/config.toml`, where the workspace
//! root is `COMPLAINTDESK_HOME` when set and the OS data directory otherwise:
//!   %APPDATA%/ComplaintDesk on Windows
//!   $XDG_DATA_HOME/ComplaintDesk on Linux
//!   ~/Library/Application Support/ComplaintDesk on macOS

use anyhow::{Context, Result};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Standard relative path to the config file (resolved per OS at runtime).
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Environment variable overriding the workspace root.
pub const HOME_ENV_VAR: &str = "COMPLAINTDESK_HOME";

/// Root configuration persisted per installation.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AppConfig {
    /// Complaint store behaviour (task keys, transition policy, scoring).
    #[serde(default)]
    pub store: StoreSettings,
    /// Sentiment/translation enrichment knobs.
    #[serde(default)]
    pub enrichment: EnrichmentSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreSettings {
    /// Prefix of human-readable task keys, e.g. `TASK-12`.
    #[serde(default = "default_task_key_prefix")]
    pub task_key_prefix: String,
    /// When set, status changes must follow the transition table.
    #[serde(default)]
    pub strict_transitions: bool,
    /// Inclusive bounds of the placeholder impact score.
    #[serde(default = "default_impact_score_min")]
    pub impact_score_min: u32,
    #[serde(default = "default_impact_score_max")]
    pub impact_score_max: u32,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            task_key_prefix: default_task_key_prefix(),
            strict_transitions: false,
            impact_score_min: default_impact_score_min(),
            impact_score_max: default_impact_score_max(),
        }
    }
}

fn default_task_key_prefix() -> String {
    "TASK".to_string()
}

const fn default_impact_score_min() -> u32 {
    1
}

const fn default_impact_score_max() -> u32 {
    100
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnrichmentSettings {
    /// Whether new complaints and comments are queued for enrichment at all.
    #[serde(default = "default_enrichment_enabled")]
    pub enabled: bool,
    /// Threads in the detached enrichment pool.
    #[serde(default = "default_worker_threads")]
    pub worker_threads: u32,
    /// Pending jobs older than this fall back to the unavailable sentinel.
    #[serde(default = "default_enrichment_timeout_ms")]
    pub timeout_ms: u64,
    /// Language requested when no explicit target is given.
    #[serde(default = "default_language")]
    pub default_language: String,
}

impl Default for EnrichmentSettings {
    fn default() -> Self {
        Self {
            enabled: default_enrichment_enabled(),
            worker_threads: default_worker_threads(),
            timeout_ms: default_enrichment_timeout_ms(),
            default_language: default_language(),
        }
    }
}

const fn default_enrichment_enabled() -> bool {
    true
}

const fn default_worker_threads() -> u32 {
    2
}

const fn default_enrichment_timeout_ms() -> u64 {
    30_000
}

fn default_language() -> String {
    "English".to_string()
}

/// Returns the root directory where ComplaintDesk stores data.
///
/// Order of precedence:
/// 1. `COMPLAINTDESK_HOME` environment variable.
/// 2. OS-specific data directory via `directories::BaseDirs`.
pub fn workspace_root() -> Result<PathBuf> {
    if let Ok(path) = env::var(HOME_ENV_VAR) {
        return Ok(PathBuf::from(path));
    }
    let base_dirs = BaseDirs::new().context("Unable to determine OS data directory")?;
    Ok(base_dirs.data_dir().join("ComplaintDesk"))
}

pub fn config_dir() -> Result<PathBuf> {
    Ok(workspace_root()?.join("config"))
}

/// Path to the config file.
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Loads the configuration from disk or returns defaults.
pub fn load_or_default() -> Result<AppConfig> {
    let path = config_file_path()?;
    if path.exists() {
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let cfg: AppConfig = toml::from_str(&data)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        Ok(cfg)
    } else {
        Ok(AppConfig::default())
    }
}

/// Persists the configuration to disk.
pub fn save(config: &AppConfig) -> Result<()> {
    fs::create_dir_all(config_dir()?)?;
    let path = config_file_path()?;
    let data = toml::to_string_pretty(config)?;
    fs::write(&path, data)?;
    Ok(())
}

/// Ensures the workspace structure exists (data/ and logs/ directories).
pub fn ensure_workspace_structure() -> Result<WorkspacePaths> {
    let root = workspace_root()?;
    let data_dir = root.join("data");
    let logs_dir = root.join("logs");
    fs::create_dir_all(&data_dir)?;
    fs::create_dir_all(&logs_dir)?;
    Ok(WorkspacePaths {
        root,
        data_dir,
        logs_dir,
    })
}

/// Convenience struct exposing important workspace paths.
#[derive(Debug, Clone)]
pub struct WorkspacePaths {
    pub root: PathBuf,
    pub data_dir: PathBuf,
    pub logs_dir: PathBuf,
}

impl WorkspacePaths {
    pub fn snapshot_path(&self) -> PathBuf {
        self.data_dir.join(crate::persistence::SNAPSHOT_FILE_NAME)
    }

    pub fn activity_log_path(&self) -> PathBuf {
        self.logs_dir.join("events.jsonl")
    }
}
