//! Sync manifest: the files produced by the most recent run

use super::error::{Result, SyncError};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub generated_at: String,
    #[serde(default)]
    pub files: Vec<String>,
}

impl Manifest {
    /// New manifest stamped with the current UTC time (millisecond precision)
    pub fn new(files: Vec<String>) -> Self {
        Self {
            generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            files,
        }
    }

    /// Read a previous manifest. Missing or unreadable manifests yield `None`.
    pub fn read(path: &Path) -> Option<Self> {
        let content = fs::read_to_string(path).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Write as two-space indented JSON with a trailing newline
    pub fn write(&self, path: &Path) -> Result<()> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        fs::write(path, json).map_err(|e| SyncError::io(path, e))
    }

    /// Files listed in `previous` but not in this manifest
    pub fn stale_since(&self, previous: &Self) -> Vec<String> {
        previous
            .files
            .iter()
            .filter(|f| !self.files.contains(f))
            .cloned()
            .collect()
    }
}
