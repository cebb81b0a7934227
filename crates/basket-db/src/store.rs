//! # Key-Value Store Port
//!
//! The seam between the cart and wherever its snapshot is kept.
//! [`KeyValueRepository`](crate::KeyValueRepository) is the SQLite backend;
//! [`MemoryStore`] keeps everything in process and can be given a byte quota,
//! which is how callers exercise the "storage full" path.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{DbError, DbResult};

/// Durable string-to-string storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the value under `key`.
    async fn get(&self, key: &str) -> DbResult<Option<String>>;

    /// Replaces the value under `key`.
    async fn set(&self, key: &str, value: &str) -> DbResult<()>;

    /// Deletes `key`. Deleting a missing key is not an error.
    async fn remove(&self, key: &str) -> DbResult<()>;
}

/// A thread-safe in-memory store.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
    /// Maximum total bytes of keys plus values, if bounded.
    quota: Option<usize>,
}

impl MemoryStore {
    /// Creates a new, empty, unbounded store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that rejects writes pushing it past `max_bytes`.
    pub fn with_quota(max_bytes: usize) -> Self {
        MemoryStore {
            entries: Arc::default(),
            quota: Some(max_bytes),
        }
    }

    /// Returns the number of stored keys.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Checks if the store holds no keys.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> DbResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> DbResult<()> {
        let mut entries = self.entries.write().await;

        if let Some(max_bytes) = self.quota {
            let others: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > max_bytes {
                return Err(DbError::QuotaExceeded(format!(
                    "{} bytes needed, {} allowed",
                    needed, max_bytes
                )));
            }
        }

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> DbResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}
