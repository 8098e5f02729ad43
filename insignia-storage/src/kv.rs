//! Persisted store adapter seam.
//!
//! The badge store talks to its backing store exclusively through
//! [`KeyValueStore`]: a namespaced async key→value blob store. Each
//! operation is individually atomic; there are no cross-key transaction
//! guarantees, and the orchestration layer is written around that.
//!
//! `StoreKey`'s private constructor means a key cannot exist without a
//! namespace: every read and write is namespace-scoped by construction.

use async_trait::async_trait;
use insignia_core::InsigniaResult;
use std::fmt;

/// Separator between the namespace and the logical key name.
const SEPARATOR: char = '/';

/// Logical name of the consolidated key holding every profile's badge set.
pub const CONSOLIDATED_KEY: &str = "badge_records_all";

/// Prefix of the retired per-profile key scheme. A legacy key is this
/// prefix followed by the profile id.
pub const LEGACY_KEY_PREFIX: &str = "badge_records_";

/// A namespaced persisted-store key.
///
/// Only two shapes exist: the consolidated table key and a legacy
/// per-profile key. Both can only be built through the constructors here,
/// so ad-hoc key strings never reach the adapters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoreKey {
    /// Private inner data - cannot be constructed externally
    inner: KeyInner,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct KeyInner {
    namespace: String,
    name: String,
}

impl StoreKey {
    /// The consolidated key for a namespace.
    pub fn consolidated(namespace: &str) -> Self {
        Self {
            inner: KeyInner {
                namespace: namespace.to_string(),
                name: CONSOLIDATED_KEY.to_string(),
            },
        }
    }

    /// The legacy per-profile key for a namespace and profile id.
    pub fn legacy(namespace: &str, profile: &str) -> Self {
        Self {
            inner: KeyInner {
                namespace: namespace.to_string(),
                name: format!("{LEGACY_KEY_PREFIX}{profile}"),
            },
        }
    }

    /// The namespace this key is scoped to.
    pub fn namespace(&self) -> &str {
        &self.inner.namespace
    }

    /// The logical key name inside the namespace.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Encode this key to the flat string adapters store under.
    ///
    /// Format: `<namespace>/<name>`.
    pub fn encode(&self) -> String {
        format!(
            "{}{}{}",
            self.inner.namespace, SEPARATOR, self.inner.name
        )
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.inner.namespace, SEPARATOR, self.inner.name)
    }
}

/// Async blob store the badge system persists into.
///
/// Implementations must make each operation atomic on its own: a `set`
/// observed by a later `get` was applied in full. Absence is data here,
/// so `get` distinguishes a missing key (`Ok(None)`) from an empty value.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the blob stored under `key`. `Ok(None)` means the key is
    /// absent, which is distinct from an empty encoded collection.
    async fn get(&self, key: &StoreKey) -> InsigniaResult<Option<Vec<u8>>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &StoreKey, value: Vec<u8>) -> InsigniaResult<()>;

    /// Remove `key`. Deleting an absent key is not an error.
    async fn delete(&self, key: &StoreKey) -> InsigniaResult<()>;
}

// ============================================================================
// TESTS
// ============================================================================
