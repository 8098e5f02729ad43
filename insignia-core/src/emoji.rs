//! Stateless emoji-to-image-URL derivation.
//!
//! Maps a rendered emoji glyph to a CDN-hosted PNG by spelling the glyph's
//! codepoints in lowercase hex, joined by `-`. Pure and total: empty input
//! yields an empty URL, never an error.

/// Base URL of the emoji image CDN (Twemoji assets, 72x72 PNG).
pub const EMOJI_CDN_BASE: &str = "https://cdn.jsdelivr.net/gh/jdecked/twemoji@latest/assets/72x72";

/// U+FE0F requests emoji presentation but is absent from asset file names.
const VARIATION_SELECTOR_16: char = '\u{FE0F}';

/// Derive the image URL for an emoji glyph using the default CDN.
///
/// ```
/// use insignia_core::emoji::emoji_image_url;
///
/// let url = emoji_image_url("🎮");
/// assert!(url.ends_with("/1f3ae.png"));
/// assert_eq!(emoji_image_url(""), "");
/// ```
pub fn emoji_image_url(glyph: &str) -> String {
    emoji_image_url_at(EMOJI_CDN_BASE, glyph)
}

/// Derive the image URL for an emoji glyph against a caller-chosen CDN base.
pub fn emoji_image_url_at(base: &str, glyph: &str) -> String {
    let codepoints: Vec<String> = glyph
        .chars()
        .filter(|c| *c != VARIATION_SELECTOR_16)
        .map(|c| format!("{:x}", c as u32))
        .collect();
    if codepoints.is_empty() {
        return String::new();
    }
    format!("{}/{}.png", base.trim_end_matches('/'), codepoints.join("-"))
}

// ============================================================================
// TESTS
// ============================================================================
