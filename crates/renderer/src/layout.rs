//! Text measurement results and per-render text styles.

use badge_common::{BadgeResult, Rgb};
use std::path::PathBuf;

use crate::skin::{Align, Position, SkinDefinition, TextPlacement};

/// Point sizes are reduced by this much per shrink-to-fit step.
pub const SHRINK_STEP: f32 = 2.0;

/// Ink box and advance of a measured string, relative to its origin on the baseline.
///
/// `y_bearing` is negative for ink above the baseline.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextExtents {
    pub x_bearing: f32,
    pub y_bearing: f32,
    pub width: f32,
    pub height: f32,
    pub x_advance: f32,
}

/// Everything needed to draw one string, resolved for a single render.
///
/// Built from a [`TextPlacement`] template; shaded colors and shrunk sizes
/// are applied here and never reach the shared skin.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font: Option<PathBuf>,
    pub size: f32,
    pub color: Rgb,
    pub anchor: Position,
    /// Degrees, clockwise
    pub angle: f32,
    pub align: Align,
    pub box_width: Option<f32>,
}

impl TextStyle {
    pub fn from_placement(skin: &SkinDefinition, placement: &TextPlacement) -> Self {
        Self {
            font: skin.font_for(placement).map(|p| p.to_path_buf()),
            size: placement.font_size,
            color: placement.primary_color(),
            anchor: placement.pos,
            angle: placement.angle,
            align: placement.align,
            box_width: placement.box_width(),
        }
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    pub fn with_size(&self, size: f32) -> Self {
        Self {
            size,
            ..self.clone()
        }
    }

    pub fn is_visible(&self) -> bool {
        self.size > 0.0
    }

    /// Whether `origin` needs the string measured first.
    pub fn needs_extents(&self) -> bool {
        self.align != Align::Left
    }

    /// Baseline origin to draw from.
    ///
    /// Left-aligned text starts at the anchor. Centered text has its ink box
    /// centered on the anchor x and hanging down from the anchor y.
    /// Right-aligned text ends its ink box at the anchor x. With a box width
    /// the anchor x moves to the box's left edge, middle or right edge.
    pub fn origin(&self, extents: &TextExtents) -> (f32, f32) {
        let Position { x, y } = self.anchor;
        let w = self.box_width.unwrap_or(0.0);

        match self.align {
            Align::Left => (x, y),
            Align::Center => (
                x + w / 2.0 - extents.x_bearing - extents.width / 2.0,
                y - extents.y_bearing,
            ),
            Align::Right => (x + w - extents.x_bearing - extents.width, y),
        }
    }
}

/// Reduce `size` in [`SHRINK_STEP`] decrements until `measure(size)` fits `max_width`.
///
/// Returns the final size, which is zero or negative when nothing fits.
/// Terminates because the size strictly decreases and stops at zero.
pub fn shrink_to_fit<F>(size: f32, max_width: f32, mut measure: F) -> BadgeResult<f32>
where
    F: FnMut(f32) -> BadgeResult<f32>,
{
    let mut size = size;
    if size <= 0.0 {
        return Ok(size);
    }

    let mut width = measure(size)?;
    while width > max_width {
        size -= SHRINK_STEP;
        if size <= 0.0 {
            break;
        }
        width = measure(size)?;
    }

    Ok(size)
}
