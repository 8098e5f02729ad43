//! Icon resolution seam.

use insignia_core::emoji::emoji_image_url;

/// Resolves an emoji glyph to an image URL.
///
/// Implementations must be pure and total: an empty glyph resolves to an
/// empty URL, never an error.
pub trait IconResolver: Send + Sync {
    /// Resolve a rendered emoji glyph to an image URL.
    fn resolve(&self, glyph: &str) -> String;
}

/// Default resolver deriving Twemoji CDN URLs from the glyph's codepoints.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmojiCdnResolver;

impl IconResolver for EmojiCdnResolver {
    fn resolve(&self, glyph: &str) -> String {
        emoji_image_url(glyph)
    }
}
