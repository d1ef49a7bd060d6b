//! File-backed memory store: one JSON document per user identity.
//!
//! Documents live under `<dir>/users/<user_id>.json`; the shared change log sits at
//! `<dir>/log.json`, so no identity can collide with it. Every mutating call builds the
//! next document on a copy and only adopts it once it is on disk, so a failed write
//! leaves both the in-memory state and the change log untouched.
//!
//! The store assumes a single writer per identity: two `MemoryStore` values for the
//! same `user_id` will overwrite each other's changes. It is only opened by the
//! single-process `arcadia memory` CLI; no HTTP route touches it.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde_json::Value;

use super::log::ChangeLog;
use super::path::{get_path, set_path, KeyPath};
use super::types::{default_document, ChangeLogEntry, DELETABLE_SECTIONS};
use super::MemoryError;

/// Subdirectory of the memory dir holding one document per identity.
pub const USERS_DIR: &str = "users";

pub struct MemoryStore {
    user_id: String,
    path: PathBuf,
    log: ChangeLog,
    data: Value,
}

/// Reject ids that are empty or could address a file outside the users directory.
pub fn validate_user_id(user_id: &str) -> Result<(), MemoryError> {
    let invalid = user_id.trim().is_empty()
        || user_id == "."
        || user_id.contains("..")
        || user_id.contains(['/', '\\', '\0']);
    if invalid {
        return Err(MemoryError::InvalidUserId(user_id.to_string()));
    }
    Ok(())
}

impl MemoryStore {
    /// Open the store for `user_id` under `dir`, creating the directories if needed,
    /// and load the document.
    pub fn open(dir: impl AsRef<Path>, user_id: &str) -> Result<Self, MemoryError> {
        validate_user_id(user_id)?;
        let dir = dir.as_ref();
        let users_dir = dir.join(USERS_DIR);
        std::fs::create_dir_all(&users_dir)?;

        let mut store = Self {
            user_id: user_id.to_string(),
            path: users_dir.join(format!("{user_id}.json")),
            log: ChangeLog::new(dir),
            data: default_document(),
        };
        store.load();
        Ok(store)
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn log(&self) -> &ChangeLog {
        &self.log
    }

    /// The full in-memory document.
    pub fn document(&self) -> &Value {
        &self.data
    }

    /// Reload from disk. A missing or unparseable file (or one whose root is not an
    /// object) resets the in-memory state to a fresh default document.
    pub fn load(&mut self) {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(_) => {
                self.data = default_document();
                return;
            }
        };

        match serde_json::from_str::<Value>(&contents) {
            Ok(doc) if doc.is_object() => self.data = doc,
            Ok(_) | Err(_) => {
                tracing::warn!(
                    user_id = %self.user_id,
                    path = %self.path.display(),
                    "unreadable memory document, starting fresh"
                );
                self.data = default_document();
            }
        }
    }

    /// `system.memory_enabled`, defaulting to `true` when absent.
    pub fn is_enabled(&self) -> bool {
        self.data
            .get("system")
            .and_then(|s| s.get("memory_enabled"))
            .and_then(Value::as_bool)
            .unwrap_or(true)
    }

    /// Resolve `path`, returning `default` when memory is disabled, the path is
    /// malformed, or any segment is missing.
    pub fn get(&self, path: &str, default: Value) -> Value {
        if !self.is_enabled() {
            return default;
        }
        let Ok(key_path) = KeyPath::parse(path) else {
            return default;
        };
        get_path(&self.data, &key_path).cloned().unwrap_or(default)
    }

    /// Set `value` at `path` and persist. Returns `Ok(false)` without touching anything
    /// when memory is disabled.
    pub fn update(&mut self, path: &str, value: Value) -> Result<bool, MemoryError> {
        if !self.is_enabled() {
            return Ok(false);
        }
        let key_path = KeyPath::parse(path)?;
        let mut next = self.data.clone();
        set_path(&mut next, &key_path, value.clone())?;
        self.commit(next)?;
        self.record(ChangeLogEntry::new("update", path, &value));

        tracing::debug!(user_id = %self.user_id, path = %path, "memory updated");
        Ok(true)
    }

    /// Remove `key` from the `user` section, or failing that from `conversations`.
    /// Returns whether anything was removed.
    pub fn delete(&mut self, key: &str) -> Result<bool, MemoryError> {
        let section = DELETABLE_SECTIONS.iter().copied().find(|section| {
            self.data
                .get(*section)
                .and_then(Value::as_object)
                .is_some_and(|map| map.contains_key(key))
        });

        let Some(section) = section else {
            return Ok(false);
        };

        let mut next = self.data.clone();
        if let Some(map) = next.get_mut(section).and_then(Value::as_object_mut) {
            map.remove(key);
        }
        self.commit(next)?;

        tracing::debug!(user_id = %self.user_id, section = %section, key = %key, "memory key deleted");
        Ok(true)
    }

    /// Delete the backing file (if any) and reset to a default document.
    pub fn clear(&mut self) -> Result<(), MemoryError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        self.data = default_document();
        tracing::info!(user_id = %self.user_id, "memory cleared");
        Ok(())
    }

    /// Toggle `system.memory_enabled`. Unlike [`update`](Self::update) this works
    /// while memory is disabled, so a disabled store can be turned back on.
    pub fn set_enabled(&mut self, enabled: bool) -> Result<(), MemoryError> {
        let key_path = KeyPath::parse("system.memory_enabled")?;
        let mut next = self.data.clone();
        set_path(&mut next, &key_path, Value::Bool(enabled))?;
        self.commit(next)?;
        self.record(ChangeLogEntry::new(
            "toggle",
            "system.memory_enabled",
            &Value::Bool(enabled),
        ));
        Ok(())
    }

    /// Refresh `system.updated_at` on `next`, write it, and adopt it only once the
    /// write succeeded.
    fn commit(&mut self, mut next: Value) -> Result<(), MemoryError> {
        let key_path = KeyPath::parse("system.updated_at")?;
        set_path(&mut next, &key_path, serde_json::to_value(Utc::now())?)?;

        let json = serde_json::to_string_pretty(&next)?;
        std::fs::write(&self.path, json)?;
        self.data = next;
        Ok(())
    }

    fn record(&self, entry: ChangeLogEntry) {
        if let Err(e) = self.log.append(entry) {
            tracing::warn!(error = %e, "failed to write change log");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn open(tmp: &TempDir) -> MemoryStore {
        MemoryStore::open(tmp.path(), "default").unwrap()
    }

    #[test]
    fn update_then_get_nested() {
        let tmp = TempDir::new().unwrap();
        let mut store = open(&tmp);

        assert!(store.update("a.b.c", json!(5)).unwrap());
        assert_eq!(store.get("a.b.c", Value::Null), json!(5));
        assert_eq!(store.get("a.b.x", json!(7)), json!(7));
    }

    #[test]
    fn update_refreshes_updated_at_and_persists() {
        let tmp = TempDir::new().unwrap();
        let mut store = open(&tmp);
        let created = store.get("system.updated_at", Value::Null);

        std::thread::sleep(std::time::Duration::from_millis(5));
        store.update("user.name", json!("Mirko")).unwrap();

        let updated = store.get("system.updated_at", Value::Null);
        assert_ne!(created, updated);

        let on_disk: Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(on_disk["user"]["name"], json!("Mirko"));
        assert_eq!(on_disk["system"]["updated_at"], updated);
    }

    #[test]
    fn update_writes_change_log() {
        let tmp = TempDir::new().unwrap();
        let mut store = open(&tmp);
        store.update("user.city", json!("Roma")).unwrap();

        let entries = store.log().entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, "update");
        assert_eq!(entries[0].key, "user.city");
        assert_eq!(entries[0].value_preview, "Roma");
    }

    #[test]
    fn invalid_path_is_an_error_not_a_panic() {
        let tmp = TempDir::new().unwrap();
        let mut store = open(&tmp);
        assert!(matches!(
            store.update("user..x", json!(1)),
            Err(MemoryError::InvalidPath(_))
        ));
        assert_eq!(store.get("", json!("fallback")), json!("fallback"));
    }

    #[test]
    fn rejected_write_leaves_document_and_log_untouched() {
        let tmp = TempDir::new().unwrap();
        let mut store = open(&tmp);
        let before = store.document().clone();

        assert!(matches!(
            store.update("system", json!(5)),
            Err(MemoryError::PathConflict(_))
        ));
        assert_eq!(store.document(), &before);
        assert!(store.log().entries().is_empty());

        assert!(store.update("user.name", json!("Mirko")).unwrap());
        assert_eq!(store.get("user.name", Value::Null), json!("Mirko"));
    }

    #[test]
    fn failed_save_is_not_applied_or_logged() {
        let tmp = TempDir::new().unwrap();
        let mut store = open(&tmp);
        // a directory where the document should be makes the write fail
        std::fs::create_dir(store.path()).unwrap();

        assert!(matches!(
            store.update("user.city", json!("Roma")),
            Err(MemoryError::Io(_))
        ));
        assert_eq!(store.get("user.city", Value::Null), Value::Null);
        assert!(store.log().entries().is_empty());
    }

    #[test]
    fn delete_refreshes_updated_at() {
        let tmp = TempDir::new().unwrap();
        let mut store = open(&tmp);
        store.update("user.city", json!("Roma")).unwrap();
        let before = store.get("system.updated_at", Value::Null);

        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(store.delete("city").unwrap());

        let after = store.get("system.updated_at", Value::Null);
        assert_ne!(before, after);
        let on_disk: Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(on_disk["system"]["updated_at"], after);
        assert!(on_disk["user"].get("city").is_none());
    }

    #[test]
    fn user_ids_cannot_leave_the_users_dir() {
        for bad in ["", "  ", ".", "..", "../escaped", "a/b", "a\\b", "x..y"] {
            assert!(
                matches!(validate_user_id(bad), Err(MemoryError::InvalidUserId(_))),
                "accepted {bad:?}"
            );
        }
        for good in ["default", "mirko", "log", "user-1", "nome.cognome"] {
            assert!(validate_user_id(good).is_ok(), "rejected {good:?}");
        }
    }
}
