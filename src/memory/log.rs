//! Bounded on-disk change log (`log.json` at the root of the memory dir, shared by all
//! identities).
//!
//! Logging is best-effort: a missing or corrupt log file is treated as empty, and only
//! the most recent [`MAX_LOG_ENTRIES`] entries are kept.

use std::path::{Path, PathBuf};

use super::types::ChangeLogEntry;
use super::MemoryError;

pub const MAX_LOG_ENTRIES: usize = 100;
pub const LOG_FILE_NAME: &str = "log.json";

#[derive(Debug, Clone)]
pub struct ChangeLog {
    path: PathBuf,
}

impl ChangeLog {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(LOG_FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all entries. Unreadable or malformed files yield an empty list.
    pub fn entries(&self) -> Vec<ChangeLogEntry> {
        let Ok(contents) = std::fs::read_to_string(&self.path) else {
            return Vec::new();
        };
        match serde_json::from_str(&contents) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "corrupt change log, resetting");
                Vec::new()
            }
        }
    }

    /// Append `entry` and rewrite the file with the last [`MAX_LOG_ENTRIES`] entries.
    pub fn append(&self, entry: ChangeLogEntry) -> Result<(), MemoryError> {
        let mut entries = self.entries();
        entries.push(entry);
        let start = entries.len().saturating_sub(MAX_LOG_ENTRIES);
        let json = serde_json::to_string_pretty(&entries[start..])?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}
