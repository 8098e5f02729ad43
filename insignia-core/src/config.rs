//! Configuration for the badge store and display layer.

use crate::error::{ConfigError, InsigniaResult};
use crate::ProfileId;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default freshness window for cached badge sets.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Default key namespace under which badge data is persisted.
pub const DEFAULT_NAMESPACE: &str = "insignia";

/// Whose badges the display layer queries the store for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BadgeVisibility {
    /// Only the locally configured profile gets badges.
    LocalOnly,
    /// Every profile is queried.
    Everyone,
}

/// Configuration for the INSIGNIA badge store.
#[derive(Debug, Clone)]
pub struct InsigniaConfig {
    /// How long a cached badge set counts as fresh.
    pub cache_ttl: Duration,
    /// Key namespace prepended to every persisted key.
    pub namespace: String,
    /// Whose badges are shown.
    pub visibility: BadgeVisibility,
    /// The profile owned by this installation, if any.
    pub local_profile: Option<ProfileId>,
}

impl Default for InsigniaConfig {
    fn default() -> Self {
        Self {
            cache_ttl: DEFAULT_CACHE_TTL,
            namespace: DEFAULT_NAMESPACE.to_string(),
            visibility: BadgeVisibility::LocalOnly,
            local_profile: None,
        }
    }
}

impl InsigniaConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cache freshness window.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Set the key namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Set the badge visibility policy.
    pub fn with_visibility(mut self, visibility: BadgeVisibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Set the local profile id.
    pub fn with_local_profile(mut self, profile: impl Into<ProfileId>) -> Self {
        self.local_profile = Some(profile.into());
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> InsigniaResult<()> {
        if self.namespace.is_empty() {
            return Err(ConfigError::MissingRequired {
                field: "namespace".to_string(),
            }
            .into());
        }
        if self.namespace.contains('/') {
            return Err(ConfigError::InvalidValue {
                field: "namespace".to_string(),
                value: self.namespace.clone(),
                reason: "'/' is reserved as the key separator".to_string(),
            }
            .into());
        }
        if self.cache_ttl.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "cache_ttl".to_string(),
                value: "0s".to_string(),
                reason: "freshness window must be positive".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
