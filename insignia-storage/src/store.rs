//! The badge record store: cache-first reads, serialized writes.
//!
//! `BadgeStore` composes the persisted store adapter, the TTL cache, and
//! the legacy migrator behind two consumer-facing operations:
//!
//! - [`BadgeStore::load`] for the display path. Never fails: on store
//!   trouble it degrades to the last cached value (stale included) or an
//!   empty set, and reports the failure through logging only.
//! - [`BadgeStore::save`] for the editor path. Runs a read-merge-write
//!   cycle on the consolidated table, serialized store-wide, and surfaces
//!   failures so the editor can keep its unsaved state.
//!
//! The consolidated table is one blob holding every profile's records, so
//! every read-merge-write cycle in the process shares one writer lock.
//! Concurrent saves queue behind it in arrival order; without that, two
//! saves for different profiles could each read the pre-save table and the
//! second write would erase the first profile's update.

use std::sync::Arc;

use insignia_core::{BadgeRecord, InsigniaConfig, InsigniaResult};
use tokio::sync::Mutex;
use tracing::warn;

use crate::cache::{BadgeCache, CachedBadges};
use crate::kv::KeyValueStore;
use crate::migrate::{self, LegacyMigrator, WriterLock};

/// Badge record store over an arbitrary [`KeyValueStore`] adapter.
pub struct BadgeStore {
    kv: Arc<dyn KeyValueStore>,
    cache: BadgeCache,
    migrator: LegacyMigrator,
    writer: WriterLock,
    namespace: String,
}

impl BadgeStore {
    /// Build a store over an adapter using the given configuration.
    ///
    /// Callers should run [`InsigniaConfig::validate`] first; the store
    /// trusts the namespace and TTL it is given.
    pub fn new(kv: Arc<dyn KeyValueStore>, config: &InsigniaConfig) -> Self {
        let writer: WriterLock = Arc::new(Mutex::new(()));
        Self {
            cache: BadgeCache::new(config.cache_ttl),
            migrator: LegacyMigrator::new(kv.clone(), config.namespace.clone(), writer.clone()),
            writer,
            namespace: config.namespace.clone(),
            kv,
        }
    }

    /// The TTL cache, exposed for stats and host-driven invalidation.
    pub fn cache(&self) -> &BadgeCache {
        &self.cache
    }

    /// Strict read: the badge set for `profile`, from cache when fresh,
    /// otherwise from the persisted store (migrating on the way).
    ///
    /// Fails on store errors. The editor opens sessions through this so a
    /// user never edits on top of silently-defaulted data.
    pub async fn fetch(&self, profile: &str) -> InsigniaResult<Vec<BadgeRecord>> {
        if let Some(cached) = self.cache.get(profile) {
            if cached.is_fresh() {
                return Ok(cached.into_records());
            }
        }

        let records = self.migrator.badges_for(profile).await?;
        self.cache.put(profile, records.clone());
        Ok(records)
    }

    /// Degrading read for the display path.
    ///
    /// On failure this returns the most recent cached records for the
    /// profile even if stale, or an empty set, and logs the error. Callers
    /// render whatever comes back.
    pub async fn load(&self, profile: &str) -> Vec<BadgeRecord> {
        match self.fetch(profile).await {
            Ok(records) => records,
            Err(err) => {
                let fallback = self.cache.get(profile).map(CachedBadges::into_records);
                warn!(
                    profile = %profile,
                    error = %err,
                    stale_fallback = fallback.is_some(),
                    "badge load failed; serving last known records"
                );
                fallback.unwrap_or_default()
            }
        }
    }

    /// Persist `records` as the complete badge set for `profile`.
    ///
    /// Read-merge-write on the consolidated table: other profiles' entries
    /// are preserved, this profile's entry is replaced verbatim (an empty
    /// list is stored as an empty list, making removal durable). On success
    /// the cache is updated so the save is immediately visible and the
    /// legacy key for the profile is best-effort deleted. On failure
    /// nothing is cached and the error reaches the caller.
    pub async fn save(&self, profile: &str, records: Vec<BadgeRecord>) -> InsigniaResult<()> {
        {
            let _guard = self.writer.lock().await;
            let mut table = migrate::read_table(self.kv.as_ref(), &self.namespace).await?;
            table.insert(profile.to_string(), records.clone());
            migrate::write_table(self.kv.as_ref(), &self.namespace, &table).await?;
            // Cache update stays inside the lock so overlapping saves reach
            // the cache in table-write order.
            self.cache.put(profile, records);
        }

        migrate::delete_legacy_best_effort(self.kv.as_ref(), &self.namespace, profile).await;
        Ok(())
    }

    /// Retry removal of a profile's legacy key. See
    /// [`LegacyMigrator::cleanup_legacy`].
    pub async fn cleanup_legacy(&self, profile: &str) -> InsigniaResult<bool> {
        self.migrator.cleanup_legacy(profile).await
    }
}

// ============================================================================
// TESTS
// ============================================================================
