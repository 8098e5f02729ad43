//! INSIGNIA Core - Badge Data Types
//!
//! Pure data model for the INSIGNIA badge store: records, configuration,
//! the error taxonomy, and emoji icon derivation. No I/O lives here; the
//! storage and display layers build on these types.

pub mod badge;
pub mod config;
pub mod emoji;
pub mod error;

pub use badge::{BadgeRecord, BadgeSet, BadgeTable, IconSource, ProfileId};
pub use config::{BadgeVisibility, InsigniaConfig, DEFAULT_CACHE_TTL, DEFAULT_NAMESPACE};
pub use emoji::{emoji_image_url, EMOJI_CDN_BASE};
pub use error::{ConfigError, InsigniaError, InsigniaResult, StoreError};

use chrono::{DateTime, Utc};

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;
