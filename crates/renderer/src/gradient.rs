//! Performance-based color shading for headline metrics.
//!
//! A metric is mapped onto a score `t` in `[0, 1]` and the drawn color is the
//! linear blend `t * c1 + (1 - t) * c2`, where `(c1, c2)` is either the
//! (high, mid) or (mid, low) pair of the placement's colors.

use badge_common::Rgb;

use crate::skin::TextPlacement;

/// Which pair of reference colors a score blends between.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shade {
    pub t: f64,
    pub upper: bool,
}

impl Shade {
    /// Resolve against high/mid/low colors.
    pub fn color(&self, high: Rgb, mid: Rgb, low: Rgb) -> Rgb {
        if self.upper {
            high.blend(&mid, self.t)
        } else {
            mid.blend(&low, self.t)
        }
    }
}

/// Score a kill ratio: ratios from 1 to 2 shade from mid to high, below 1 from low to mid.
pub fn kd_ratio_shade(ratio: f64) -> Shade {
    if ratio >= 1.0 {
        Shade {
            t: (ratio - 1.0).min(1.0),
            upper: true,
        }
    } else {
        Shade {
            t: ratio.max(0.0),
            upper: false,
        }
    }
}

/// Score a win percentage: above 50 shades from mid to high, otherwise low to mid.
pub fn win_pct_shade(pct: f64) -> Shade {
    if pct > 50.0 {
        Shade {
            t: (2.0 * (pct / 100.0 - 0.5)).min(1.0),
            upper: true,
        }
    } else {
        Shade {
            t: (2.0 * (pct / 100.0)).max(0.0),
            upper: false,
        }
    }
}

/// Color for a kill ratio drawn with `placement`.
///
/// Placements without three colors are drawn in their primary color.
pub fn shade_kd_ratio(ratio: f64, placement: &TextPlacement) -> Rgb {
    shade_with(kd_ratio_shade(ratio), placement)
}

/// Color for a win percentage drawn with `placement`.
pub fn shade_win_pct(pct: f64, placement: &TextPlacement) -> Rgb {
    shade_with(win_pct_shade(pct), placement)
}

fn shade_with(shade: Shade, placement: &TextPlacement) -> Rgb {
    match placement.shade_colors() {
        Some((high, mid, low)) => shade.color(high, mid, low),
        None => placement.primary_color(),
    }
}
