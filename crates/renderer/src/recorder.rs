//! Layout-recording backend.
//!
//! Instead of pixels it records every placed string as a JSON document.
//! Used for dry runs and for checking placement logic without fonts.

use badge_common::{BadgeError, BadgeResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::backend::{BadgeBackend, TextCanvas};
use crate::layout::{TextExtents, TextStyle};
use crate::skin::SkinDefinition;

/// Estimated advance per character, as a fraction of the point size.
pub const CHAR_WIDTH_FACTOR: f32 = 0.6;
/// Estimated ascent, as a fraction of the point size.
pub const ASCENT_FACTOR: f32 = 0.8;

/// One recorded string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawOp {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    /// "#rrggbb"
    pub color: String,
    pub angle: f32,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub font: Option<String>,
}

/// Everything drawn on one badge, in draw order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutDump {
    pub skin: String,
    pub width: u32,
    pub height: u32,
    pub ops: Vec<DrawOp>,
}

impl LayoutDump {
    /// Parse bytes produced by a [`LayoutCanvas`].
    pub fn from_bytes(bytes: &[u8]) -> BadgeResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Ops whose text is exactly `text`.
    pub fn ops_with_text<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a DrawOp> {
        self.ops.iter().filter(move |op| op.text == text)
    }
}

/// Backend producing [`LayoutDump`] JSON instead of images.
#[derive(Debug, Default, Clone, Copy)]
pub struct LayoutBackend;

impl LayoutBackend {
    pub fn new() -> Self {
        Self
    }
}

impl BadgeBackend for LayoutBackend {
    fn name(&self) -> &'static str {
        "layout"
    }

    fn extension(&self) -> &'static str {
        "json"
    }

    fn warm_up(&self, _skins: &HashMap<String, SkinDefinition>) -> Vec<(String, BadgeError)> {
        Vec::new()
    }

    fn begin<'a>(&'a self, skin: &SkinDefinition) -> BadgeResult<Box<dyn TextCanvas + 'a>> {
        Ok(Box::new(LayoutCanvas::new(skin)))
    }
}

/// Canvas that records draw calls.
pub struct LayoutCanvas {
    dump: LayoutDump,
}

impl LayoutCanvas {
    pub fn new(skin: &SkinDefinition) -> Self {
        Self {
            dump: LayoutDump {
                skin: skin.name.clone(),
                width: skin.width,
                height: skin.height,
                ops: Vec::new(),
            },
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.dump.ops
    }

    pub fn into_dump(self) -> LayoutDump {
        self.dump
    }
}

impl TextCanvas for LayoutCanvas {
    /// Fixed-pitch estimate: every character is the same width.
    fn measure(&self, text: &str, style: &TextStyle) -> BadgeResult<TextExtents> {
        let size = style.size.max(0.0);
        let width = text.chars().count() as f32 * size * CHAR_WIDTH_FACTOR;
        Ok(TextExtents {
            x_bearing: 0.0,
            y_bearing: -size * ASCENT_FACTOR,
            width,
            height: size,
            x_advance: width,
        })
    }

    fn draw(&mut self, text: &str, origin: (f32, f32), style: &TextStyle) -> BadgeResult<()> {
        if !style.is_visible() {
            return Ok(());
        }
        self.dump.ops.push(DrawOp {
            text: text.to_string(),
            x: origin.0,
            y: origin.1,
            size: style.size,
            color: style.color.to_hex(),
            angle: style.angle,
            font: style.font.as_ref().map(|p| p.display().to_string()),
        });
        Ok(())
    }

    fn finish(self: Box<Self>) -> BadgeResult<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(&self.dump)?)
    }
}
