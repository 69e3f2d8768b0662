//! Durable key-value persistence used by the Sendero permission store.
//!
//! # Purpose
//! Provides a small async key-value abstraction and two backends: an
//! in-memory map for tests and local development, and a directory of files
//! for deployments that need overrides to survive restarts.
//!
//! # Key invariants
//! - Keys are restricted to `[A-Za-z0-9._-]` so they map safely onto file names.
//! - A `put` is all-or-nothing: readers observe either the previous value or
//!   the new one, never a partial write.
//!
//! # Examples
//! ```rust
//! use bytes::Bytes;
//! use sendero_storage::{KeyValueStore, MemoryStore};
//!
//! let store = MemoryStore::new();
//! let rt = tokio::runtime::Runtime::new().expect("rt");
//! rt.block_on(async {
//!     store.put("matrix", Bytes::from_static(b"{}")).await.expect("put");
//!     assert_eq!(store.get("matrix").await.expect("get"), Some(Bytes::from_static(b"{}")));
//! });
//! ```
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;

pub mod storage_backends;

pub use storage_backends::file::FileStore;

pub type Result<T> = std::result::Result<T, StorageError>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Async key-value persistence contract.
///
/// Implementations are last-write-wins; callers that need compare-and-swap
/// semantics must layer versioning on top.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetch the value stored under `key`, or `None` if it was never written.
    async fn get(&self, key: &str) -> Result<Option<Bytes>>;
    /// Replace the value stored under `key`.
    async fn put(&self, key: &str, value: Bytes) -> Result<()>;
    /// Remove `key`. Removing a missing key succeeds.
    async fn delete(&self, key: &str) -> Result<()>;
    async fn health_check(&self) -> Result<()>;
    fn is_durable(&self) -> bool;
    fn backend_name(&self) -> &'static str;
}

/// Validate that a key is usable by every backend.
pub fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key != "."
        && key != ".."
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'-'));
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

/// In-memory key-value store.
///
/// Not durable: all state is lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    // RwLock allows concurrent readers while updates take exclusive access.
    inner: RwLock<HashMap<String, Bytes>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        validate_key(key)?;
        Ok(self.inner.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: Bytes) -> Result<()> {
        validate_key(key)?;
        self.inner.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        validate_key(key)?;
        self.inner.write().await.remove(key);
        Ok(())
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }

    fn is_durable(&self) -> bool {
        false
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_validation() {
        assert!(validate_key("sendero.permission-matrix").is_ok());
        assert!(validate_key("matrix_v2").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("..").is_err());
        assert!(validate_key("../etc/passwd").is_err());
        assert!(validate_key("a/b").is_err());
    }

    #[tokio::test]
    async fn put_get_delete_round_trip() {
        let store = MemoryStore::new();
        assert!(store.is_empty().await);
        store
            .put("k", Bytes::from_static(b"value"))
            .await
            .expect("put");
        assert_eq!(
            store.get("k").await.expect("get"),
            Some(Bytes::from_static(b"value"))
        );
        assert_eq!(store.len().await, 1);
        store.delete("k").await.expect("delete");
        assert!(store.get("k").await.expect("get").is_none());
        store.delete("k").await.expect("delete missing");
    }

    #[tokio::test]
    async fn put_overwrites_previous_value() {
        let store = MemoryStore::new();
        store.put("k", Bytes::from_static(b"a")).await.expect("put");
        store.put("k", Bytes::from_static(b"b")).await.expect("put");
        assert_eq!(
            store.get("k").await.expect("get"),
            Some(Bytes::from_static(b"b"))
        );
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn invalid_key_is_rejected() {
        let store = MemoryStore::new();
        let err = store
            .put("bad/key", Bytes::from_static(b"x"))
            .await
            .expect_err("invalid key");
        assert!(matches!(err, StorageError::InvalidKey(_)));
        assert!(!store.is_durable());
        assert_eq!(store.backend_name(), "memory");
    }
}
