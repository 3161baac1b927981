//! Chronological record of every version transition.
//!
//! The log is loaded whole, appended in memory during a run, and written back
//! whole at the end, so earlier runs' entries are never dropped.
use crate::decision::Origin;
use crate::persist::{load_json_or_default, write_json_atomic};
use crate::version::Version;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

pub const HISTORY_FILE: &str = "history.json";
const NO_VERSION: &str = "none";

/// A version before a transition; files that had no marker record `"none"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorVersion(pub Option<Version>);

impl fmt::Display for PriorVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(version) => version.fmt(f),
            None => f.write_str(NO_VERSION),
        }
    }
}

impl Serialize for PriorVersion {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PriorVersion {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        if text.trim().eq_ignore_ascii_case(NO_VERSION) {
            return Ok(PriorVersion(None));
        }
        Ok(PriorVersion(Some(Version::parse_lenient(&text))))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub file: String,
    pub old_version: PriorVersion,
    pub new_version: Version,
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub origin: Origin,
}

#[derive(Debug, Clone)]
pub struct HistoryLog {
    path: PathBuf,
    entries: Vec<HistoryEntry>,
}

impl HistoryLog {
    pub fn load(path: &Path) -> Result<Self> {
        let entries = load_json_or_default(path, "history log")?;
        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn save(&self) -> Result<()> {
        write_json_atomic(&self.path, &self.entries)
    }
}
