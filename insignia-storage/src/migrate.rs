//! One-way migration of legacy per-profile keys into the consolidated table.
//!
//! Early revisions persisted each profile's badges under an individual key
//! (`badge_records_<id>`). The consolidated table replaced that layout, and
//! this module moves data over on first touch: merge into the table, write
//! the table, then delete the legacy key. That ordering means a legacy value
//! is never removed before the table durably holds it, so a failed delete
//! duplicates data instead of losing it.

use std::sync::Arc;

use insignia_core::{BadgeSet, BadgeTable, InsigniaResult, StoreError};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::kv::{KeyValueStore, StoreKey};

/// Serializes every read-merge-write cycle over the consolidated table.
///
/// The table is one blob shared by all profiles; two interleaved cycles
/// would silently drop one writer's entry. The badge store and the migrator
/// must hold the same lock.
pub type WriterLock = Arc<Mutex<()>>;

// ============================================================================
// TABLE CODEC
// ============================================================================
// Shared by the migrator and the badge store so both writers agree on the
// wire shape of the consolidated key.

/// Read and decode the consolidated table. An absent key is an empty table.
pub(crate) async fn read_table(
    kv: &dyn KeyValueStore,
    namespace: &str,
) -> InsigniaResult<BadgeTable> {
    let key = StoreKey::consolidated(namespace);
    match kv.get(&key).await? {
        None => Ok(BadgeTable::new()),
        Some(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
            StoreError::Malformed {
                key: key.to_string(),
                reason: e.to_string(),
            }
            .into()
        }),
    }
}

/// Encode and write the consolidated table.
pub(crate) async fn write_table(
    kv: &dyn KeyValueStore,
    namespace: &str,
    table: &BadgeTable,
) -> InsigniaResult<()> {
    let key = StoreKey::consolidated(namespace);
    let bytes = serde_json::to_vec(table).map_err(|e| StoreError::Malformed {
        key: key.to_string(),
        reason: e.to_string(),
    })?;
    kv.set(&key, bytes).await
}

/// Read and decode a legacy per-profile value, if the key exists.
pub(crate) async fn read_legacy(
    kv: &dyn KeyValueStore,
    namespace: &str,
    profile: &str,
) -> InsigniaResult<Option<BadgeSet>> {
    let key = StoreKey::legacy(namespace, profile);
    if key == StoreKey::consolidated(namespace) {
        // The one id whose legacy spelling is the consolidated key itself
        // ("all"); it has no per-profile history, and reading the key would
        // decode the table as a record list.
        return Ok(None);
    }
    match kv.get(&key).await? {
        None => Ok(None),
        Some(bytes) => serde_json::from_slice(&bytes).map(Some).map_err(|e| {
            StoreError::Malformed {
                key: key.to_string(),
                reason: e.to_string(),
            }
            .into()
        }),
    }
}

/// Delete a legacy key, logging instead of failing.
pub(crate) async fn delete_legacy_best_effort(
    kv: &dyn KeyValueStore,
    namespace: &str,
    profile: &str,
) {
    let key = StoreKey::legacy(namespace, profile);
    if key == StoreKey::consolidated(namespace) {
        // Deleting this id's "legacy key" would drop the whole table.
        return;
    }
    if let Err(err) = kv.delete(&key).await {
        warn!(
            profile = %profile,
            error = %err,
            "failed to delete migrated legacy key; value remains duplicated"
        );
    }
}

// ============================================================================
// LEGACY MIGRATOR
// ============================================================================

/// Moves a profile's records from its legacy key into the consolidated
/// table. Safe to invoke on every cold load; it no-ops once the table holds
/// the profile's data.
pub struct LegacyMigrator {
    kv: Arc<dyn KeyValueStore>,
    namespace: String,
    writer: WriterLock,
}

impl LegacyMigrator {
    /// Create a migrator over the given adapter.
    ///
    /// `writer` must be the same lock the owning store uses to serialize
    /// consolidated-table writes, or migration merges could interleave with
    /// saves.
    pub fn new(
        kv: Arc<dyn KeyValueStore>,
        namespace: impl Into<String>,
        writer: WriterLock,
    ) -> Self {
        Self {
            kv,
            namespace: namespace.into(),
            writer,
        }
    }

    /// Return the badge set for `profile`, migrating its legacy key first if
    /// one is still present.
    ///
    /// Read failures and table-write failures surface to the caller. A
    /// failed legacy-key delete does not: at that point the data lives in
    /// the table and the stale key merely duplicates it, which
    /// [`LegacyMigrator::cleanup_legacy`] can retry later.
    pub async fn badges_for(&self, profile: &str) -> InsigniaResult<BadgeSet> {
        let table = read_table(self.kv.as_ref(), &self.namespace).await?;
        if let Some(records) = table.get(profile) {
            if !records.is_empty() {
                return Ok(records.clone());
            }
        }

        let Some(legacy) = read_legacy(self.kv.as_ref(), &self.namespace, profile).await? else {
            return Ok(BadgeSet::new());
        };
        if legacy.is_empty() {
            return Ok(BadgeSet::new());
        }

        let migrated = {
            let _guard = self.writer.lock().await;
            // A save may have landed between the optimistic reads above and
            // acquiring the lock; nothing read before the lock can be
            // trusted for the merge.
            let mut table = read_table(self.kv.as_ref(), &self.namespace).await?;
            if let Some(current) = table.get(profile) {
                if !current.is_empty() {
                    return Ok(current.clone());
                }
            }
            // A save also deletes the legacy key. Gone or emptied means the
            // table entry, explicit removals included, is the newer truth.
            let legacy = match read_legacy(self.kv.as_ref(), &self.namespace, profile).await? {
                Some(records) if !records.is_empty() => records,
                _ => return Ok(table.get(profile).cloned().unwrap_or_default()),
            };
            table.insert(profile.to_string(), legacy.clone());
            write_table(self.kv.as_ref(), &self.namespace, &table).await?;
            legacy
        };

        delete_legacy_best_effort(self.kv.as_ref(), &self.namespace, profile).await;
        debug!(profile = %profile, count = migrated.len(), "migrated legacy badge records");
        Ok(migrated)
    }

    /// Retry removal of a profile's legacy key, first folding any remaining
    /// legacy value into the consolidated table.
    ///
    /// Returns `Ok(true)` when a legacy key existed and was deleted,
    /// `Ok(false)` when there was nothing to do. Unlike
    /// [`LegacyMigrator::badges_for`], a delete failure propagates here:
    /// removing the key is the entire point of this operation.
    pub async fn cleanup_legacy(&self, profile: &str) -> InsigniaResult<bool> {
        let Some(initial) = read_legacy(self.kv.as_ref(), &self.namespace, profile).await? else {
            return Ok(false);
        };

        if !initial.is_empty() {
            let _guard = self.writer.lock().await;
            // Re-read under the lock; a save that won it already rewrote
            // the table entry and deleted the legacy key.
            let legacy = read_legacy(self.kv.as_ref(), &self.namespace, profile)
                .await?
                .filter(|records| !records.is_empty());
            if let Some(legacy) = legacy {
                let mut table = read_table(self.kv.as_ref(), &self.namespace).await?;
                let table_has_data = table
                    .get(profile)
                    .is_some_and(|records| !records.is_empty());
                // A non-empty table entry is newer truth than the straggler
                // key.
                if !table_has_data {
                    table.insert(profile.to_string(), legacy);
                    write_table(self.kv.as_ref(), &self.namespace, &table).await?;
                }
            }
        }

        self.kv
            .delete(&StoreKey::legacy(&self.namespace, profile))
            .await?;
        debug!(profile = %profile, "removed legacy badge key");
        Ok(true)
    }
}

// ============================================================================
// TESTS
// ============================================================================


// ============================================================================
// PROPERTY-BASED TESTS
// ============================================================================

#[cfg(test)]
mod prop_tests {
    use super::*;
    use crate::memory::MemoryStore;
    use insignia_core::BadgeRecord;
    use proptest::collection::{btree_map, vec};
    use proptest::prelude::*;

    const NS: &str = "test";

    fn record_strategy() -> impl Strategy<Value = BadgeRecord> {
        ("[a-z]{1,8}", "[a-z]{0,4}", "[a-z]{0,12}")
            .prop_map(|(name, emoji, url)| BadgeRecord::new(name, emoji, url))
    }

    fn table_strategy() -> impl Strategy<Value = BadgeTable> {
        btree_map("[0-9]{1,4}", vec(record_strategy(), 0..3), 0..4)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        /// Property: the migration read path is idempotent for any initial
        /// table and legacy value. Running it twice returns the same records
        /// and leaves the same persisted table as running it once.
        #[test]
        fn prop_migration_is_idempotent(
            initial in table_strategy(),
            legacy in vec(record_strategy(), 0..3),
            profile in "[0-9]{1,4}",
        ) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            rt.block_on(async {
                let kv = Arc::new(MemoryStore::new());
                write_table(kv.as_ref(), NS, &initial).await.unwrap();
                kv.set(
                    &StoreKey::legacy(NS, &profile),
                    serde_json::to_vec(&legacy).unwrap(),
                )
                .await
                .unwrap();
                let migrator =
                    LegacyMigrator::new(kv.clone(), NS, Arc::new(Mutex::new(())));

                let first = migrator.badges_for(&profile).await.unwrap();
                let table_after_first = read_table(kv.as_ref(), NS).await.unwrap();

                let second = migrator.badges_for(&profile).await.unwrap();
                let table_after_second = read_table(kv.as_ref(), NS).await.unwrap();

                prop_assert_eq!(first, second);
                prop_assert_eq!(table_after_first, table_after_second);
                Ok(())
            })?;
        }

        /// Property: migration never disturbs other profiles' table entries.
        #[test]
        fn prop_migration_preserves_unrelated_entries(
            initial in table_strategy(),
            legacy in vec(record_strategy(), 1..3),
            profile in "[0-9]{1,4}",
        ) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            rt.block_on(async {
                let kv = Arc::new(MemoryStore::new());
                write_table(kv.as_ref(), NS, &initial).await.unwrap();
                kv.set(
                    &StoreKey::legacy(NS, &profile),
                    serde_json::to_vec(&legacy).unwrap(),
                )
                .await
                .unwrap();
                let migrator =
                    LegacyMigrator::new(kv.clone(), NS, Arc::new(Mutex::new(())));

                migrator.badges_for(&profile).await.unwrap();

                let after = read_table(kv.as_ref(), NS).await.unwrap();
                for (id, records) in &initial {
                    if id != &profile {
                        prop_assert_eq!(after.get(id), Some(records));
                    }
                }
                Ok(())
            })?;
        }
    }
}
