//! LMDB-backed persisted store adapter.
//!
//! Uses the heed crate (Rust bindings for LMDB) to give the badge store a
//! memory-mapped on-disk backend. LMDB transactions make each get/set/delete
//! individually atomic, which is exactly the guarantee [`KeyValueStore`]
//! promises; nothing here spans two keys in one transaction.

use std::path::Path;

use async_trait::async_trait;
use heed::types::{Bytes, Str};
use heed::{Database, Env, EnvOpenOptions};
use insignia_core::{InsigniaResult, StoreError};

use crate::kv::{KeyValueStore, StoreKey};

/// On-disk [`KeyValueStore`] backed by a single LMDB database.
///
/// Values are stored verbatim under the key's encoded string form, so the
/// database stays inspectable with stock LMDB tooling.
pub struct LmdbStore {
    /// The LMDB environment.
    env: Env,
    /// The single unnamed database holding all namespaced keys.
    db: Database<Str, Bytes>,
}

impl LmdbStore {
    /// Open (or create) an LMDB store rooted at `path`.
    ///
    /// # Arguments
    ///
    /// * `path` - Directory where LMDB files will be stored
    /// * `max_size_mb` - Maximum size of the database in megabytes
    pub fn open<P: AsRef<Path>>(path: P, max_size_mb: usize) -> InsigniaResult<Self> {
        std::fs::create_dir_all(&path).map_err(|e| StoreError::Unavailable {
            reason: format!("failed to create {}: {e}", path.as_ref().display()),
        })?;

        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(max_size_mb * 1024 * 1024)
                .max_dbs(1)
                .open(path.as_ref())
        }
        .map_err(|e| StoreError::Unavailable {
            reason: format!("failed to open LMDB environment: {e}"),
        })?;

        let mut wtxn = env.write_txn().map_err(|e| StoreError::Unavailable {
            reason: format!("failed to begin setup transaction: {e}"),
        })?;

        let db: Database<Str, Bytes> =
            env.create_database(&mut wtxn, None)
                .map_err(|e| StoreError::Unavailable {
                    reason: format!("failed to open database: {e}"),
                })?;

        wtxn.commit().map_err(|e| StoreError::Unavailable {
            reason: format!("failed to commit setup transaction: {e}"),
        })?;

        Ok(Self { env, db })
    }
}

#[async_trait]
impl KeyValueStore for LmdbStore {
    async fn get(&self, key: &StoreKey) -> InsigniaResult<Option<Vec<u8>>> {
        let encoded = key.encode();

        let rtxn = self.env.read_txn().map_err(|e| StoreError::ReadFailed {
            key: encoded.clone(),
            reason: e.to_string(),
        })?;

        let value = self
            .db
            .get(&rtxn, &encoded)
            .map_err(|e| StoreError::ReadFailed {
                key: encoded.clone(),
                reason: e.to_string(),
            })?;

        Ok(value.map(|bytes| bytes.to_vec()))
    }

    async fn set(&self, key: &StoreKey, value: Vec<u8>) -> InsigniaResult<()> {
        let encoded = key.encode();

        let mut wtxn = self.env.write_txn().map_err(|e| StoreError::WriteFailed {
            key: encoded.clone(),
            reason: e.to_string(),
        })?;

        self.db
            .put(&mut wtxn, &encoded, &value)
            .map_err(|e| StoreError::WriteFailed {
                key: encoded.clone(),
                reason: e.to_string(),
            })?;

        wtxn.commit().map_err(|e| StoreError::WriteFailed {
            key: encoded,
            reason: e.to_string(),
        })?;

        Ok(())
    }

    async fn delete(&self, key: &StoreKey) -> InsigniaResult<()> {
        let encoded = key.encode();

        let mut wtxn = self.env.write_txn().map_err(|e| StoreError::DeleteFailed {
            key: encoded.clone(),
            reason: e.to_string(),
        })?;

        // Deleting an absent key reports false; absence is fine here.
        self.db
            .delete(&mut wtxn, &encoded)
            .map_err(|e| StoreError::DeleteFailed {
                key: encoded.clone(),
                reason: e.to_string(),
            })?;

        wtxn.commit().map_err(|e| StoreError::DeleteFailed {
            key: encoded,
            reason: e.to_string(),
        })?;

        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
