//! Turns stored badge records into renderable descriptors.
//!
//! The host's rendering loop may call into this once per visible profile,
//! so everything here rides on [`BadgeStore::load`]'s degrading contract:
//! whatever happens underneath, `badges_for` answers with a (possibly
//! empty) list and never an error.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use insignia_core::{BadgeVisibility, IconSource, InsigniaConfig, ProfileId};
use insignia_storage::BadgeStore;

use crate::resolver::{EmojiCdnResolver, IconResolver};

/// Side-effect callback fired when a badge is activated (clicked). The
/// argument is the profile id the badge belongs to.
pub type ActivateFn = Arc<dyn Fn(&str) + Send + Sync>;

/// One renderable badge.
pub struct BadgeDescriptor {
    /// Tooltip text (the record's name).
    pub tooltip: String,
    /// Resolved icon URL, never empty.
    pub icon_url: String,
    profile: ProfileId,
    on_activate: Option<ActivateFn>,
}

impl BadgeDescriptor {
    /// The profile this badge belongs to.
    pub fn profile(&self) -> &str {
        &self.profile
    }

    /// Fire the activation callback, if one is configured.
    pub fn activate(&self) {
        if let Some(callback) = &self.on_activate {
            callback(&self.profile);
        }
    }
}

impl fmt::Debug for BadgeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BadgeDescriptor")
            .field("tooltip", &self.tooltip)
            .field("icon_url", &self.icon_url)
            .field("profile", &self.profile)
            .field("has_on_activate", &self.on_activate.is_some())
            .finish()
    }
}

/// Contract a badge-rendering host consumes.
///
/// Hosts consult [`ProfileBadgeSource::should_query`] first and request
/// badges only for profiles it accepts; `badges_for` does not re-check
/// visibility.
#[async_trait]
pub trait ProfileBadgeSource: Send + Sync {
    /// Whether the host should request badges for this profile at all.
    fn should_query(&self, profile: &str) -> bool;

    /// Renderable descriptors for a profile. Never fails; an empty list
    /// means "render nothing".
    async fn badges_for(&self, profile: &str) -> Vec<BadgeDescriptor>;
}

/// The display adapter registered into the badge-rendering host.
pub struct DisplayAdapter {
    store: Arc<BadgeStore>,
    resolver: Arc<dyn IconResolver>,
    visibility: BadgeVisibility,
    local_profile: Option<ProfileId>,
    on_activate: Option<ActivateFn>,
}

impl DisplayAdapter {
    /// Create an adapter over a store, resolving icons through the default
    /// emoji CDN resolver.
    pub fn new(store: Arc<BadgeStore>, config: &InsigniaConfig) -> Self {
        Self {
            store,
            resolver: Arc::new(EmojiCdnResolver),
            visibility: config.visibility,
            local_profile: config.local_profile.clone(),
            on_activate: None,
        }
    }

    /// Swap in a custom icon resolver.
    pub fn with_resolver(mut self, resolver: Arc<dyn IconResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Set the callback fired when a badge is activated.
    pub fn with_on_activate(mut self, callback: ActivateFn) -> Self {
        self.on_activate = Some(callback);
        self
    }
}

#[async_trait]
impl ProfileBadgeSource for DisplayAdapter {
    fn should_query(&self, profile: &str) -> bool {
        match self.visibility {
            BadgeVisibility::Everyone => true,
            BadgeVisibility::LocalOnly => self.local_profile.as_deref() == Some(profile),
        }
    }

    async fn badges_for(&self, profile: &str) -> Vec<BadgeDescriptor> {
        let records = self.store.load(profile).await;
        records
            .into_iter()
            .filter(|record| record.is_displayable())
            .filter_map(|record| {
                let icon_url = match record.icon_source() {
                    IconSource::Url(url) => url.to_string(),
                    IconSource::Glyph(glyph) => self.resolver.resolve(glyph),
                    IconSource::None => return None,
                };
                // A resolver may come up empty for an exotic glyph; a badge
                // without an icon is not rendered.
                if icon_url.is_empty() {
                    return None;
                }
                Some(BadgeDescriptor {
                    tooltip: record.name,
                    icon_url,
                    profile: profile.to_string(),
                    on_activate: self.on_activate.clone(),
                })
            })
            .collect()
    }
}

// ============================================================================
// TESTS
// ============================================================================
