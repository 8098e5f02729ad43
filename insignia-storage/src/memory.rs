//! In-memory persisted store adapter.

use crate::kv::{KeyValueStore, StoreKey};
use async_trait::async_trait;
use insignia_core::InsigniaResult;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory [`KeyValueStore`] backed by a `HashMap`.
///
/// Durable for the life of the process only. Used by tests and by
/// embedders whose host supplies its own persistence underneath.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// True when no keys are stored.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &StoreKey) -> InsigniaResult<Option<Vec<u8>>> {
        let entries = self.entries.read().await;
        Ok(entries.get(&key.encode()).cloned())
    }

    async fn set(&self, key: &StoreKey, value: Vec<u8>) -> InsigniaResult<()> {
        let mut entries = self.entries.write().await;
        entries.insert(key.encode(), value);
        Ok(())
    }

    async fn delete(&self, key: &StoreKey) -> InsigniaResult<()> {
        let mut entries = self.entries.write().await;
        entries.remove(&key.encode());
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
