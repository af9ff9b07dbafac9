//! Colorized nickname parsing.
//!
//! Game nicknames carry inline color escapes: a `^` marker followed by a
//! selector. In the Xonotic scheme the selector is a digit `0`-`9` from a
//! fixed palette or `xRGB` with three hex digits, `^^` is a literal caret,
//! and glyphs from the game font's private-use block are mapped back to
//! their ASCII look-alikes before parsing.
//!
//! Parsing never fails: anything that is not a complete escape is kept as
//! literal text.

use serde::Serialize;

use crate::color::Rgb;

const ESCAPE: char = '^';

/// Color used for text before the first escape.
pub const DEFAULT_NICK_COLOR: Rgb = Rgb::WHITE;

/// Palette for the `^0`..`^9` selectors.
const DIGIT_COLORS: [Rgb; 10] = [
    Rgb { r: 0.0, g: 0.0, b: 0.0 },
    Rgb { r: 1.0, g: 0.0, b: 0.0 },
    Rgb { r: 0.0, g: 1.0, b: 0.0 },
    Rgb { r: 1.0, g: 1.0, b: 0.0 },
    Rgb { r: 0.0, g: 0.0, b: 1.0 },
    Rgb { r: 0.0, g: 1.0, b: 1.0 },
    Rgb { r: 1.0, g: 0.0, b: 1.0 },
    Rgb { r: 1.0, g: 1.0, b: 1.0 },
    Rgb { r: 0.5, g: 0.5, b: 0.5 },
    Rgb { r: 0.5, g: 0.5, b: 0.5 },
];

/// Start of the game font's private-use glyph block.
const GLYPH_BASE: u32 = 0xE000;

/// ASCII stand-ins for glyphs 0x00-0x1F (repeated at 0x80-0x9F).
const LOW_GLYPHS: [char; 32] = [
    '#', '#', '#', '#', '#', '.', '#', '#', '#', ' ', ' ', '#', ' ', ' ', '.', '.', //
    '[', ']', '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', '.', '<', '=', '>',
];

/// ASCII stand-ins for glyphs 0x80-0x9F.
const HIGH_GLYPHS: [char; 32] = [
    '<', '=', '>', '#', '#', '.', '#', '#', '#', '#', ' ', '#', ' ', '>', '.', '.', //
    '[', ']', '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', '.', '<', '=', '>',
];

/// Escape syntax a nickname is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorScheme {
    /// `^0`-`^9`, `^xRGB`, `^^`, plus private-use glyph mapping.
    #[default]
    Xonotic,
    /// `^0`-`^9` only.
    Quake,
}

impl ColorScheme {
    fn decode_glyph(&self, c: char) -> char {
        match self {
            ColorScheme::Xonotic => decode_xonotic_glyph(c),
            ColorScheme::Quake => c,
        }
    }

    fn supports_hex(&self) -> bool {
        matches!(self, ColorScheme::Xonotic)
    }

    fn supports_caret_escape(&self) -> bool {
        matches!(self, ColorScheme::Xonotic)
    }
}

/// Map a private-use font glyph to printable ASCII.
fn decode_xonotic_glyph(c: char) -> char {
    let code = c as u32;
    if !(GLYPH_BASE..=GLYPH_BASE + 0xFF).contains(&code) {
        return c;
    }

    let n = (code - GLYPH_BASE) as u8;
    match n {
        0x00..=0x1F => LOW_GLYPHS[n as usize],
        0x20..=0x7E => n as char,
        0x80..=0x9F => HIGH_GLYPHS[(n - 0x80) as usize],
        0xA0..=0xFE => (n - 0x80) as char,
        // 0x7F and 0xFF
        _ => '<',
    }
}

/// One run of text drawn in a single color.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorPart {
    pub text: String,
    pub color: Rgb,
}

/// A nickname split into colored runs.
///
/// There is always at least one part, and the part texts concatenate to
/// `stripped()`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColoredString {
    raw: String,
    parts: Vec<ColorPart>,
    stripped: String,
}

impl Default for ColoredString {
    fn default() -> Self {
        Self::parse("", ColorScheme::default())
    }
}

impl ColoredString {
    /// Decode a raw nickname.
    pub fn parse(raw: &str, scheme: ColorScheme) -> Self {
        let chars: Vec<char> = raw.chars().map(|c| scheme.decode_glyph(c)).collect();

        let mut parts: Vec<ColorPart> = Vec::new();
        let mut current = String::new();
        let mut color = DEFAULT_NICK_COLOR;

        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            if c != ESCAPE {
                current.push(c);
                i += 1;
                continue;
            }

            match parse_escape(&chars[i + 1..], scheme) {
                Some(Escape::Color(next, consumed)) => {
                    if !current.is_empty() {
                        parts.push(ColorPart {
                            text: std::mem::take(&mut current),
                            color,
                        });
                    }
                    color = next;
                    i += 1 + consumed;
                }
                Some(Escape::Caret) => {
                    current.push(ESCAPE);
                    i += 2;
                }
                None => {
                    current.push(ESCAPE);
                    i += 1;
                }
            }
        }

        if !current.is_empty() || parts.is_empty() {
            parts.push(ColorPart { text: current, color });
        }

        let stripped = parts.iter().map(|p| p.text.as_str()).collect();

        Self {
            raw: raw.to_string(),
            parts,
            stripped,
        }
    }

    /// The nickname as it was received.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Plain text with all escapes removed.
    pub fn stripped(&self) -> &str {
        &self.stripped
    }

    /// Colored runs in display order.
    pub fn color_parts(&self) -> &[ColorPart] {
        &self.parts
    }

    pub fn is_empty(&self) -> bool {
        self.stripped.is_empty()
    }
}

enum Escape {
    /// New color and number of selector chars consumed after the marker.
    Color(Rgb, usize),
    Caret,
}

/// Interpret the characters following a `^` marker.
fn parse_escape(rest: &[char], scheme: ColorScheme) -> Option<Escape> {
    let selector = *rest.first()?;

    if let Some(d) = selector.to_digit(10) {
        return Some(Escape::Color(DIGIT_COLORS[d as usize], 1));
    }

    if selector == ESCAPE && scheme.supports_caret_escape() {
        return Some(Escape::Caret);
    }

    if selector == 'x' && scheme.supports_hex() && rest.len() >= 4 {
        let mut channels = [0.0f64; 3];
        for (slot, c) in channels.iter_mut().zip(&rest[1..4]) {
            *slot = c.to_digit(16)? as f64 / 15.0;
        }
        return Some(Escape::Color(
            Rgb::new(channels[0], channels[1], channels[2]),
            4,
        ));
    }

    None
}
