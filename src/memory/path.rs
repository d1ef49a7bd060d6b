//! Dot-separated key paths over a nested JSON tree.
//!
//! `"user.preferences.food"` addresses `doc["user"]["preferences"]["food"]`. Reads
//! stop at the first missing or non-object segment; writes create intermediate objects
//! but refuse to walk through an existing scalar.

use serde_json::{Map, Value};

use super::MemoryError;

/// A parsed, non-empty key path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPath {
    segments: Vec<String>,
}

impl KeyPath {
    /// Split `raw` on `.`. Empty paths and empty segments (`"a..b"`) are rejected.
    pub fn parse(raw: &str) -> Result<Self, MemoryError> {
        if raw.is_empty() {
            return Err(MemoryError::InvalidPath(raw.to_string()));
        }
        let segments: Vec<String> = raw.split('.').map(str::to_string).collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(MemoryError::InvalidPath(raw.to_string()));
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The final segment (the key that `set` writes).
    pub fn leaf(&self) -> &str {
        // parse() guarantees at least one segment
        &self.segments[self.segments.len() - 1]
    }

    pub fn parents(&self) -> &[String] {
        &self.segments[..self.segments.len() - 1]
    }
}

impl std::fmt::Display for KeyPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

impl std::str::FromStr for KeyPath {
    type Err = MemoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Resolve `path` against `root`. `None` if any segment is absent or an intermediate
/// value is not an object.
pub fn get_path<'a>(root: &'a Value, path: &KeyPath) -> Option<&'a Value> {
    let mut node = root;
    for segment in path.segments() {
        node = node.as_object()?.get(segment)?;
    }
    Some(node)
}

/// Set `value` at `path`, creating intermediate objects as needed.
pub fn set_path(root: &mut Value, path: &KeyPath, value: Value) -> Result<(), MemoryError> {
    let mut node = root;
    let mut walked = Vec::with_capacity(path.segments().len());

    for segment in path.parents() {
        let map = as_object_mut(node, &walked)?;
        node = map
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        walked.push(segment.as_str());
    }

    let map = as_object_mut(node, &walked)?;
    map.insert(path.leaf().to_string(), value);
    Ok(())
}

fn as_object_mut<'a>(
    node: &'a mut Value,
    walked: &[&str],
) -> Result<&'a mut Map<String, Value>, MemoryError> {
    node.as_object_mut()
        .ok_or_else(|| MemoryError::PathConflict(walked.join(".")))
}
