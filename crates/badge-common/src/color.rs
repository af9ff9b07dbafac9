//! RGB color model used by skins and colorized nicknames.
//!
//! Channels are floating point in `[0, 1]`, which keeps lightness capping
//! and gradient shading free of rounding until the final raster step.

use serde::{Deserialize, Serialize};

use crate::error::BadgeError;

/// An RGB color with channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ColorRepr", into = "[f64; 3]")]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Color representation accepted in skin files.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    /// Hex string: "#RRGGBB" or "#RGB"
    Hex(String),

    /// Float triple: [r, g, b]
    Array([f64; 3]),

    /// Explicit channels, upper or lower case keys
    Channels {
        #[serde(alias = "R")]
        r: f64,
        #[serde(alias = "G")]
        g: f64,
        #[serde(alias = "B")]
        b: f64,
    },
}

impl TryFrom<ColorRepr> for Rgb {
    type Error = BadgeError;

    fn try_from(repr: ColorRepr) -> Result<Self, Self::Error> {
        match repr {
            ColorRepr::Hex(s) => Rgb::from_hex(&s),
            ColorRepr::Array([r, g, b]) => Ok(Rgb::new(r, g, b)),
            ColorRepr::Channels { r, g, b } => Ok(Rgb::new(r, g, b)),
        }
    }
}

impl From<Rgb> for [f64; 3] {
    fn from(c: Rgb) -> Self {
        [c.r, c.g, c.b]
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Rgb::WHITE
    }
}

impl Rgb {
    pub const WHITE: Rgb = Rgb { r: 1.0, g: 1.0, b: 1.0 };
    pub const BLACK: Rgb = Rgb { r: 0.0, g: 0.0, b: 0.0 };

    /// Create a color, clamping each channel into `[0, 1]`.
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
        }
    }

    /// Parse "#RRGGBB" or "#RGB" (leading '#' optional).
    pub fn from_hex(hex: &str) -> Result<Self, BadgeError> {
        let digits = hex.trim().trim_start_matches('#');
        let invalid = || BadgeError::InvalidColor(hex.to_string());
        // ASCII hex digits only: channels are sliced by byte
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |s: &str, max: f64| -> Result<f64, BadgeError> {
            u8::from_str_radix(s, 16)
                .map(|v| v as f64 / max)
                .map_err(|_| invalid())
        };

        match digits.len() {
            6 => Ok(Rgb::new(
                channel(&digits[0..2], 255.0)?,
                channel(&digits[2..4], 255.0)?,
                channel(&digits[4..6], 255.0)?,
            )),
            3 => Ok(Rgb::new(
                channel(&digits[0..1], 15.0)?,
                channel(&digits[1..2], 15.0)?,
                channel(&digits[2..3], 15.0)?,
            )),
            _ => Err(invalid()),
        }
    }

    /// 8-bit RGBA, fully opaque.
    pub fn to_rgba8(&self) -> [u8; 4] {
        let q = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), 255]
    }

    /// "#rrggbb" form, used by the layout dump.
    pub fn to_hex(&self) -> String {
        let [r, g, b, _] = self.to_rgba8();
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }

    /// Channel-wise blend `t * self + (1 - t) * other`.
    pub fn blend(&self, other: &Rgb, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        Rgb::new(
            t * self.r + (1.0 - t) * other.r,
            t * self.g + (1.0 - t) * other.g,
            t * self.b + (1.0 - t) * other.b,
        )
    }

    /// Clamp HSL lightness into `[floor, ceiling]`, keeping hue and saturation.
    ///
    /// Fully desaturated colors (greys, black, white) come back unchanged.
    pub fn cap_lightness(&self, floor: f64, ceiling: f64) -> Rgb {
        let (h, s, l) = self.to_hsl();
        if s == 0.0 {
            return *self;
        }

        let capped = l.clamp(floor, ceiling.max(floor));
        if capped == l {
            return *self;
        }
        Rgb::from_hsl(h, s, capped)
    }

    /// Hue in `[0, 1)`, saturation and lightness in `[0, 1]`.
    pub fn to_hsl(&self) -> (f64, f64, f64) {
        let max = self.r.max(self.g).max(self.b);
        let min = self.r.min(self.g).min(self.b);
        let l = (max + min) / 2.0;

        if max == min {
            return (0.0, 0.0, l);
        }

        let d = max - min;
        let s = if l > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };

        let h = if max == self.r {
            (self.g - self.b) / d + if self.g < self.b { 6.0 } else { 0.0 }
        } else if max == self.g {
            (self.b - self.r) / d + 2.0
        } else {
            (self.r - self.g) / d + 4.0
        };

        (h / 6.0, s, l)
    }

    pub fn from_hsl(h: f64, s: f64, l: f64) -> Rgb {
        if s == 0.0 {
            return Rgb::new(l, l, l);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;

        Rgb::new(
            hue_to_channel(p, q, h + 1.0 / 3.0),
            hue_to_channel(p, q, h),
            hue_to_channel(p, q, h - 1.0 / 3.0),
        )
    }
}

fn hue_to_channel(p: f64, q: f64, t: f64) -> f64 {
    let t = if t < 0.0 {
        t + 1.0
    } else if t > 1.0 {
        t - 1.0
    } else {
        t
    };

    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}
