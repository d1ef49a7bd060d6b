//! Per-user persisted memory: a nested JSON document addressed by dot paths.

pub mod log;
pub mod path;
pub mod store;
pub mod types;

pub use path::KeyPath;
pub use store::MemoryStore;

/// Errors surfaced by memory writes. Reads never fail; see [`MemoryStore::load`].
#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    #[error("memory I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("memory serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("invalid user id: {0:?}")]
    InvalidUserId(String),
    #[error("invalid key path: {0:?}")]
    InvalidPath(String),
    #[error("cannot descend into non-object value at {0:?}")]
    PathConflict(String),
}
