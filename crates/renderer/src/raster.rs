//! Software raster backend: rusttype glyphs drawn with imageproc onto an RGBA canvas.

use badge_common::{BadgeError, BadgeResult, Rgb};
use image::{imageops, Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;
use imageproc::geometric_transformations::{rotate, Interpolation};
use rusttype::{point, PositionedGlyph};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use crate::backend::{BadgeBackend, TextCanvas};
use crate::fonts::{FontCache, SizedFont};
use crate::layout::{TextExtents, TextStyle};
use crate::png::encode_png;
use crate::skin::SkinDefinition;
use crate::surface::SurfaceCache;

/// Renders PNG badges. Owns the font and base canvas caches shared by every render.
#[derive(Default)]
pub struct RasterBackend {
    fonts: FontCache,
    surfaces: SurfaceCache,
}

impl RasterBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fonts(&self) -> &FontCache {
        &self.fonts
    }

    pub fn surfaces(&self) -> &SurfaceCache {
        &self.surfaces
    }

    fn prepare(&self, skin: &SkinDefinition) -> BadgeResult<()> {
        self.surfaces.get_or_build(skin)?;
        for placement in skin.placements().filter(|p| p.is_enabled()) {
            let path = skin.font_for(placement).ok_or_else(|| missing_font(skin))?;
            self.fonts.get(path, placement.font_size)?;
        }
        Ok(())
    }
}

impl BadgeBackend for RasterBackend {
    fn name(&self) -> &'static str {
        "raster"
    }

    fn extension(&self) -> &'static str {
        "png"
    }

    fn warm_up(&self, skins: &HashMap<String, SkinDefinition>) -> Vec<(String, BadgeError)> {
        let mut failures = Vec::new();
        for (name, skin) in skins {
            match self.prepare(skin) {
                Ok(()) => debug!(skin = %name, fonts = self.fonts.len(), "Warmed raster caches"),
                Err(e) => failures.push((name.clone(), e)),
            }
        }
        failures
    }

    fn begin<'a>(&'a self, skin: &SkinDefinition) -> BadgeResult<Box<dyn TextCanvas + 'a>> {
        let base = self.surfaces.get_or_build(skin)?;
        Ok(Box::new(RasterCanvas {
            image: base.as_ref().clone(),
            fonts: &self.fonts,
            skin_name: skin.name.clone(),
        }))
    }
}

/// One badge being drawn.
pub struct RasterCanvas<'a> {
    image: RgbaImage,
    fonts: &'a FontCache,
    skin_name: String,
}

impl<'a> RasterCanvas<'a> {
    fn font(&self, style: &TextStyle) -> BadgeResult<Arc<SizedFont>> {
        let path = style.font.as_deref().ok_or_else(|| BadgeError::InvalidSkin {
            path: self.skin_name.clone().into(),
            message: "no font configured".to_string(),
        })?;
        self.fonts.get(path, style.size)
    }

    /// Rotated text is drawn on a scratch layer around its origin, rotated, then composited.
    fn draw_rotated(
        &mut self,
        text: &str,
        origin: (f32, f32),
        font: &SizedFont,
        color: Rgb,
        angle: f32,
    ) {
        let extents = measure_with(font, text);
        let radius = (extents.x_advance.max(extents.x_bearing + extents.width)
            + font.scale.y)
            .ceil()
            .max(1.0);
        let side = (radius * 2.0) as u32;

        let mut layer = RgbaImage::from_pixel(side, side, Rgba([0, 0, 0, 0]));
        let [r, g, b, _] = color.to_rgba8();
        for glyph in font.font.layout(text, font.scale, point(radius, radius)) {
            draw_glyph_coverage(&mut layer, &glyph, [r, g, b]);
        }

        let rotated = rotate(
            &layer,
            (radius, radius),
            angle.to_radians(),
            Interpolation::Bilinear,
            Rgba([0, 0, 0, 0]),
        );

        let x = (origin.0 - radius).round() as i64;
        let y = (origin.1 - radius).round() as i64;
        imageops::overlay(&mut self.image, &rotated, x, y);
    }
}

impl<'a> TextCanvas for RasterCanvas<'a> {
    fn measure(&self, text: &str, style: &TextStyle) -> BadgeResult<TextExtents> {
        let font = self.font(style)?;
        Ok(measure_with(&font, text))
    }

    fn draw(&mut self, text: &str, origin: (f32, f32), style: &TextStyle) -> BadgeResult<()> {
        if text.is_empty() || !style.is_visible() {
            return Ok(());
        }
        let font = self.font(style)?;

        if style.angle != 0.0 {
            self.draw_rotated(text, origin, &font, style.color, style.angle);
            return Ok(());
        }

        // imageproc positions text by its top edge, one ascent above the baseline
        let x = origin.0.round() as i32;
        let y = (origin.1 - font.v_metrics.ascent).round() as i32;
        draw_text_mut(
            &mut self.image,
            Rgba(style.color.to_rgba8()),
            x,
            y,
            font.scale,
            &font.font,
            text,
        );
        Ok(())
    }

    fn finish(self: Box<Self>) -> BadgeResult<Vec<u8>> {
        encode_png(&self.image)
    }
}

/// Ink box and advance of `text` laid out from a baseline origin at (0, 0).
fn measure_with(font: &SizedFont, text: &str) -> TextExtents {
    let glyphs: Vec<PositionedGlyph<'_>> =
        font.font.layout(text, font.scale, point(0.0, 0.0)).collect();

    let x_advance = glyphs
        .last()
        .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
        .unwrap_or(0.0);

    let ink = glyphs
        .iter()
        .filter_map(|g| g.pixel_bounding_box())
        .fold(None, |acc: Option<(i32, i32, i32, i32)>, bb| {
            Some(match acc {
                None => (bb.min.x, bb.min.y, bb.max.x, bb.max.y),
                Some((x0, y0, x1, y1)) => (
                    x0.min(bb.min.x),
                    y0.min(bb.min.y),
                    x1.max(bb.max.x),
                    y1.max(bb.max.y),
                ),
            })
        });

    match ink {
        Some((x0, y0, x1, y1)) => TextExtents {
            x_bearing: x0 as f32,
            y_bearing: y0 as f32,
            width: (x1 - x0) as f32,
            height: (y1 - y0) as f32,
            x_advance,
        },
        None => TextExtents {
            x_advance,
            ..TextExtents::default()
        },
    }
}

/// Write a glyph's coverage as alpha over a transparent layer.
fn draw_glyph_coverage(layer: &mut RgbaImage, glyph: &PositionedGlyph<'_>, rgb: [u8; 3]) {
    let Some(bb) = glyph.pixel_bounding_box() else {
        return;
    };
    let (width, height) = layer.dimensions();

    glyph.draw(|gx, gy, coverage| {
        let x = bb.min.x + gx as i32;
        let y = bb.min.y + gy as i32;
        if x < 0 || y < 0 || x as u32 >= width || y as u32 >= height {
            return;
        }
        let alpha = (coverage.clamp(0.0, 1.0) * 255.0).round() as u8;
        let pixel = layer.get_pixel_mut(x as u32, y as u32);
        if alpha > pixel[3] {
            *pixel = Rgba([rgb[0], rgb[1], rgb[2], alpha]);
        }
    });
}

fn missing_font(skin: &SkinDefinition) -> BadgeError {
    BadgeError::InvalidSkin {
        path: Path::new(&skin.name).to_path_buf(),
        message: "an enabled text element has no font and the skin has no default font"
            .to_string(),
    }
}
