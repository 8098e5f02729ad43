//! INSIGNIA Storage - Persisted Store Adapters and the Badge Record Store
//!
//! The storage layer of the INSIGNIA badge system: the [`KeyValueStore`]
//! adapter seam with in-memory and LMDB implementations, the process-
//! lifetime TTL cache, the legacy key migrator, and [`BadgeStore`], the
//! orchestrator the editor and display layers consume.

pub mod cache;
pub mod kv;
pub mod lmdb;
pub mod memory;
pub mod migrate;
pub mod store;

pub use cache::{BadgeCache, CacheStats, CachedBadges};
pub use kv::{KeyValueStore, StoreKey, CONSOLIDATED_KEY, LEGACY_KEY_PREFIX};
pub use lmdb::LmdbStore;
pub use memory::MemoryStore;
pub use migrate::{LegacyMigrator, WriterLock};
pub use store::BadgeStore;
