//! The drawing capability the badge engine renders through.
//!
//! A [`BadgeBackend`] is long-lived and owns whatever caches it needs; it
//! hands out one [`TextCanvas`] per render. The engine only ever talks to
//! these two traits.

use badge_common::{BadgeError, BadgeResult};
use std::collections::HashMap;

use crate::layout::{TextExtents, TextStyle};
use crate::skin::SkinDefinition;

/// A single in-progress badge.
pub trait TextCanvas {
    /// Ink extents of `text` in `style`'s font and size.
    fn measure(&self, text: &str, style: &TextStyle) -> BadgeResult<TextExtents>;

    /// Draw `text` with its baseline origin at `origin`.
    fn draw(&mut self, text: &str, origin: (f32, f32), style: &TextStyle) -> BadgeResult<()>;

    /// Encode the finished badge.
    fn finish(self: Box<Self>) -> BadgeResult<Vec<u8>>;
}

/// Factory for per-render canvases.
pub trait BadgeBackend: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// File extension of the encoded output, without the dot.
    fn extension(&self) -> &'static str;

    /// Populate caches for `skins` before rendering starts.
    ///
    /// Returns the skins that could not be prepared, with the reason.
    fn warm_up(&self, skins: &HashMap<String, SkinDefinition>) -> Vec<(String, BadgeError)>;

    /// Start a new badge for `skin`.
    fn begin<'a>(&'a self, skin: &SkinDefinition) -> BadgeResult<Box<dyn TextCanvas + 'a>>;
}
