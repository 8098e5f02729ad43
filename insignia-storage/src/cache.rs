//! Process-lifetime TTL cache for badge sets.
//!
//! An in-memory map from profile id to (records, fetch timestamp). A cached
//! entry serves reads without touching the persisted store while it is
//! younger than the configured TTL; after that it is stale but still
//! returned on demand, because a stale badge set beats an empty profile
//! when the store is unreachable.
//!
//! `get` and `put` never suspend. The display path runs inside rendering
//! callbacks that must not await, so this cache uses synchronous locks and
//! stays strictly in memory.

use chrono::Utc;
use insignia_core::{BadgeRecord, ProfileId, Timestamp};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

// ============================================================================
// STATISTICS
// ============================================================================

/// Counters describing cache behavior since process start.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of lookups that found an entry (fresh or stale).
    pub hits: u64,
    /// Number of lookups that found nothing.
    pub misses: u64,
    /// Number of profiles currently cached.
    pub entry_count: u64,
}

impl CacheStats {
    /// Hit rate in `[0, 1]`; zero when no lookups happened yet.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// ============================================================================
// CACHE READ SNAPSHOT
// ============================================================================

/// Result of a cache lookup, carrying freshness metadata.
///
/// The freshness verdict is fixed at lookup time against the cache's TTL,
/// so callers branch on one bool instead of re-deriving clock math.
#[derive(Debug, Clone)]
pub struct CachedBadges {
    records: Vec<BadgeRecord>,
    fetched_at: Timestamp,
    fresh: bool,
}

impl CachedBadges {
    /// The cached records.
    pub fn records(&self) -> &[BadgeRecord] {
        &self.records
    }

    /// Consume the snapshot and return the records.
    pub fn into_records(self) -> Vec<BadgeRecord> {
        self.records
    }

    /// When the records were fetched from the persisted store.
    pub fn fetched_at(&self) -> Timestamp {
        self.fetched_at
    }

    /// True when the entry was younger than the TTL at lookup time.
    pub fn is_fresh(&self) -> bool {
        self.fresh
    }

    /// How old the entry is.
    pub fn staleness(&self) -> Duration {
        staleness_since(self.fetched_at)
    }
}

/// Duration since `fetched_at`, clamped at zero for clock skew.
fn staleness_since(fetched_at: Timestamp) -> Duration {
    let now = Utc::now();
    if now > fetched_at {
        (now - fetched_at).to_std().unwrap_or(Duration::ZERO)
    } else {
        Duration::ZERO
    }
}

// ============================================================================
// BADGE CACHE
// ============================================================================

/// One cached badge set with its fetch time.
#[derive(Debug, Clone)]
struct CacheSlot {
    records: Vec<BadgeRecord>,
    fetched_at: Timestamp,
}

/// TTL cache keyed by profile id.
///
/// An empty record list is a real cached value: "this profile has no
/// badges" is an answer worth remembering for a TTL, not a miss.
#[derive(Debug)]
pub struct BadgeCache {
    ttl: Duration,
    entries: RwLock<HashMap<ProfileId, CacheSlot>>,
    stats: RwLock<CacheStats>,
}

impl BadgeCache {
    /// Create an empty cache with the given freshness window.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
            stats: RwLock::new(CacheStats::default()),
        }
    }

    /// The freshness window entries are judged against.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Look up the cached badge set for a profile.
    ///
    /// Returns `None` only when the profile was never cached (or was
    /// removed). A stale entry is still returned, flagged stale.
    pub fn get(&self, profile: &str) -> Option<CachedBadges> {
        let found = self.entries.read().ok().and_then(|entries| {
            entries.get(profile).map(|slot| CachedBadges {
                records: slot.records.clone(),
                fetched_at: slot.fetched_at,
                fresh: staleness_since(slot.fetched_at) < self.ttl,
            })
        });

        if let Ok(mut stats) = self.stats.write() {
            if found.is_some() {
                stats.hits += 1;
            } else {
                stats.misses += 1;
            }
        }

        found
    }

    /// Cache a badge set for a profile, stamping it fetched-now.
    pub fn put(&self, profile: &str, records: Vec<BadgeRecord>) {
        let count = self.entries.write().ok().map(|mut entries| {
            entries.insert(
                profile.to_string(),
                CacheSlot {
                    records,
                    fetched_at: Utc::now(),
                },
            );
            entries.len() as u64
        });

        if let (Some(count), Ok(mut stats)) = (count, self.stats.write()) {
            stats.entry_count = count;
        }
    }

    /// Drop the cached entry for a profile. Returns whether one existed.
    pub fn remove(&self, profile: &str) -> bool {
        let outcome = self.entries.write().ok().map(|mut entries| {
            let removed = entries.remove(profile).is_some();
            (removed, entries.len() as u64)
        });

        match outcome {
            Some((removed, count)) => {
                if let Ok(mut stats) = self.stats.write() {
                    stats.entry_count = count;
                }
                removed
            }
            None => false,
        }
    }

    /// Drop every cached entry.
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
        if let Ok(mut stats) = self.stats.write() {
            stats.entry_count = 0;
        }
    }

    /// Number of profiles currently cached.
    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    /// True when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the cache counters.
    pub fn stats(&self) -> CacheStats {
        self.stats
            .read()
            .map(|stats| stats.clone())
            .unwrap_or_default()
    }
}

// ============================================================================
// TESTS
// ============================================================================
