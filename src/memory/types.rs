//! Memory document and change-log record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Schema version written into `system.version` of new documents.
pub const DOCUMENT_VERSION: &str = "1.0";

/// Top-level sections that `delete` is allowed to touch, in lookup order.
pub const DELETABLE_SECTIONS: [&str; 2] = ["user", "conversations"];

/// The `system` section of a memory document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemSection {
    pub memory_enabled: bool,
    pub version: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SystemSection {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            memory_enabled: true,
            version: DOCUMENT_VERSION.to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Build a fresh document: empty `user`, `conversations.frequent_topics = []`, and a
/// `system` section with memory enabled.
pub fn default_document() -> Value {
    let system = SystemSection::new(Utc::now());
    json!({
        "user": {},
        "conversations": { "frequent_topics": [] },
        "system": system,
    })
}

/// One entry of the bounded change log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeLogEntry {
    pub timestamp: DateTime<Utc>,
    pub action: String,
    pub key: String,
    /// First 50 characters of the value's rendering.
    pub value_preview: String,
}

/// Maximum characters kept in [`ChangeLogEntry::value_preview`].
pub const PREVIEW_CHARS: usize = 50;

impl ChangeLogEntry {
    pub fn new(action: &str, key: &str, value: &Value) -> Self {
        let rendered = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        Self {
            timestamp: Utc::now(),
            action: action.to_string(),
            key: key.to_string(),
            value_preview: rendered.chars().take(PREVIEW_CHARS).collect(),
        }
    }
}
