//! Badge records and the displayability contract.
//!
//! A badge is a small user-defined decoration next to a profile: a tooltip
//! name plus an icon sourced from either an emoji glyph or an image URL.
//! Records are plain serde data; whether a record is worth rendering is
//! decided by [`BadgeRecord::is_displayable`], never by dropping fields at
//! the storage layer.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// IDENTIFIERS AND COLLECTIONS
// ============================================================================

/// Identifier of the profile a badge set belongs to.
///
/// Profile ids are opaque strings issued by the host platform. The store
/// never interprets them beyond equality and map ordering.
pub type ProfileId = String;

/// The ordered badge list of a single profile. Order is display order.
pub type BadgeSet = Vec<BadgeRecord>;

/// The consolidated persisted value: every profile's badge set keyed by
/// profile id. This map, encoded as one blob, is the sole long-term source
/// of truth for badge data.
pub type BadgeTable = BTreeMap<ProfileId, BadgeSet>;

// ============================================================================
// BADGE RECORD
// ============================================================================

/// One user-defined badge.
///
/// All fields default to the empty string, which means "not configured".
/// Partially filled records are valid data and survive save/load unchanged;
/// they are only filtered at display time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeRecord {
    /// Tooltip text shown on hover.
    #[serde(default)]
    pub name: String,
    /// A single rendered emoji glyph (one grapheme, possibly several
    /// codepoints), or empty.
    #[serde(default, rename = "emojiGlyph")]
    pub emoji: String,
    /// Absolute URL of a custom badge image, or empty.
    #[serde(default, rename = "imageUrl")]
    pub image_url: String,
}

impl BadgeRecord {
    /// Create a record from its three fields.
    pub fn new(
        name: impl Into<String>,
        emoji: impl Into<String>,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            emoji: emoji.into(),
            image_url: image_url.into(),
        }
    }

    /// True when the record carries enough data to render: a non-empty name
    /// and at least one icon source.
    pub fn is_displayable(&self) -> bool {
        !self.name.is_empty() && (!self.emoji.is_empty() || !self.image_url.is_empty())
    }

    /// The icon source that wins for this record. A custom image URL beats
    /// the emoji glyph when both are set.
    pub fn icon_source(&self) -> IconSource<'_> {
        if !self.image_url.is_empty() {
            IconSource::Url(&self.image_url)
        } else if !self.emoji.is_empty() {
            IconSource::Glyph(&self.emoji)
        } else {
            IconSource::None
        }
    }
}

/// Where a badge icon comes from, after applying the URL-over-emoji
/// priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconSource<'a> {
    /// Use this image URL verbatim.
    Url(&'a str),
    /// Derive an image from this emoji glyph.
    Glyph(&'a str),
    /// No icon configured.
    None,
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_record_is_empty() {
        let record = BadgeRecord::default();
        assert_eq!(record.name, "");
        assert_eq!(record.emoji, "");
        assert_eq!(record.image_url, "");
        assert!(!record.is_displayable());
    }

    #[test]
    fn test_displayable_requires_name() {
        let record = BadgeRecord::new("", "🎮", "https://example.com/icon.png");
        assert!(!record.is_displayable());
    }

    #[test]
    fn test_displayable_requires_an_icon_source() {
        let record = BadgeRecord::new("Gamer", "", "");
        assert!(!record.is_displayable());
    }

    #[test]
    fn test_displayable_with_emoji_only() {
        let record = BadgeRecord::new("Gamer", "🎮", "");
        assert!(record.is_displayable());
    }

    #[test]
    fn test_displayable_with_url_only() {
        let record = BadgeRecord::new("Gamer", "", "https://example.com/icon.png");
        assert!(record.is_displayable());
    }

    #[test]
    fn test_icon_source_url_beats_glyph() {
        let record = BadgeRecord::new("Gamer", "🎮", "https://example.com/icon.png");
        assert_eq!(
            record.icon_source(),
            IconSource::Url("https://example.com/icon.png")
        );
    }

    #[test]
    fn test_icon_source_falls_back_to_glyph() {
        let record = BadgeRecord::new("Gamer", "🎮", "");
        assert_eq!(record.icon_source(), IconSource::Glyph("🎮"));
    }

    #[test]
    fn test_icon_source_none_when_unconfigured() {
        let record = BadgeRecord::new("Gamer", "", "");
        assert_eq!(record.icon_source(), IconSource::None);
    }

    #[test]
    fn test_wire_field_names() {
        let record = BadgeRecord::new("Gamer", "🎮", "https://example.com/icon.png");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["name"], "Gamer");
        assert_eq!(json["emojiGlyph"], "🎮");
        assert_eq!(json["imageUrl"], "https://example.com/icon.png");
    }

    #[test]
    fn test_missing_fields_decode_as_empty() {
        let record: BadgeRecord = serde_json::from_str(r#"{"name":"Gamer"}"#).unwrap();
        assert_eq!(record.name, "Gamer");
        assert_eq!(record.emoji, "");
        assert_eq!(record.image_url, "");
    }

    #[test]
    fn test_table_roundtrip_preserves_order() {
        let mut table = BadgeTable::new();
        table.insert(
            "7".to_string(),
            vec![
                BadgeRecord::new("First", "🥇", ""),
                BadgeRecord::new("Second", "🥈", ""),
            ],
        );
        table.insert("42".to_string(), vec![BadgeRecord::new("Answer", "", "")]);

        let bytes = serde_json::to_vec(&table).unwrap();
        let decoded: BadgeTable = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(decoded, table);
        assert_eq!(decoded["7"][0].name, "First");
        assert_eq!(decoded["7"][1].name, "Second");
    }
}

// ============================================================================
// PROPERTY-BASED TESTS
// ============================================================================
