//! Property stores - key/value persistence for knowledge base snapshots.
//!
//! A knowledge base writes two snapshots after mutating calls: its owner
//! (`kb.owner`) and its default fragmentation parameters
//! (`kb.default_fragmentation`). Both are JSON strings. Writes are best effort;
//! the in-memory structure stays authoritative.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use semantic_tags::SemanticTag;

/// Key holding the owner snapshot.
pub const OWNER_KEY: &str = "kb.owner";

/// Key holding the default fragmentation parameters.
pub const DEFAULT_FP_KEY: &str = "kb.default_fragmentation";

const SLED_TREE: &str = "context_kb_properties";

/// Failure of a property store backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("sled: {0}")]
    Sled(#[from] sled::Error),

    #[error("stored value for {key} is not valid UTF-8")]
    Encoding { key: String },
}

/// String key/value persistence owned by one knowledge base.
pub trait PropertyStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// Volatile store, lost with the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryPropertyStore {
    values: HashMap<String, String>,
}

impl MemoryPropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl PropertyStore for MemoryPropertyStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.values.remove(key);
        Ok(())
    }
}

/// Store backed by a sled tree. Every write is flushed.
pub struct SledPropertyStore {
    db: sled::Db,
    tree: sled::Tree,
}

impl SledPropertyStore {
    /// Open (or create) the store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let db = sled::open(path)?;
        let tree = db.open_tree(SLED_TREE)?;
        tracing::debug!(
            target: "context_kb::persistence",
            path = %path.display(),
            entries = tree.len(),
            "property store opened"
        );
        Ok(Self { db, tree })
    }

    /// Flush and release the database so the path can be reopened.
    pub fn close(self) -> Result<(), StoreError> {
        self.db.flush()?;
        Ok(())
    }
}

impl PropertyStore for SledPropertyStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self.tree.get(key.as_bytes())? {
            Some(bytes) => String::from_utf8(bytes.to_vec())
                .map(Some)
                .map_err(|_| StoreError::Encoding {
                    key: key.to_string(),
                }),
            None => Ok(None),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.tree.insert(key.as_bytes(), value.as_bytes())?;
        self.tree.flush()?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.tree.remove(key.as_bytes())?;
        self.tree.flush()?;
        Ok(())
    }
}

impl std::fmt::Debug for SledPropertyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SledPropertyStore")
            .field("entries", &self.tree.len())
            .finish()
    }
}

/// What is persisted of the owner: enough to find it again by SI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerSnapshot {
    pub name: String,
    pub sis: Vec<String>,
}

impl From<&SemanticTag> for OwnerSnapshot {
    fn from(tag: &SemanticTag) -> Self {
        Self {
            name: tag.name.clone(),
            sis: tag.sis.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let mut store = MemoryPropertyStore::new();
        assert!(store.get("k").unwrap().is_none());

        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        assert_eq!(store.len(), 1);

        store.remove("k").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_sled_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("props");

        let mut store = SledPropertyStore::open(&path).unwrap();
        store.set(OWNER_KEY, r#"{"name":"Alice","sis":["si:alice"]}"#).unwrap();
        store.set("scratch", "x").unwrap();
        store.remove("scratch").unwrap();
        store.close().unwrap();

        let store = SledPropertyStore::open(&path).unwrap();
        let raw = store.get(OWNER_KEY).unwrap().unwrap();
        let snapshot: OwnerSnapshot = serde_json::from_str(&raw).unwrap();
        assert_eq!(snapshot.sis, vec!["si:alice".to_string()]);
        assert!(store.get("scratch").unwrap().is_none());
    }

    #[test]
    fn test_owner_snapshot_from_tag() {
        let tag = SemanticTag::peer("Alice", ["si:alice", "si:alice2"], ["tcp://a:1"]);
        let snapshot = OwnerSnapshot::from(&tag);
        assert_eq!(snapshot.name, "Alice");
        assert_eq!(snapshot.sis.len(), 2);
    }
}
