//! INSIGNIA Display - Badge Descriptors and the Editor Contract
//!
//! The consumer-facing layer of the badge system: the display adapter a
//! badge-rendering host registers, the icon resolution seam, and the
//! editing session the settings UI drives.

pub mod adapter;
pub mod editor;
pub mod resolver;

pub use adapter::{ActivateFn, BadgeDescriptor, DisplayAdapter, ProfileBadgeSource};
pub use editor::{EditSession, EditState};
pub use resolver::{EmojiCdnResolver, IconResolver};
