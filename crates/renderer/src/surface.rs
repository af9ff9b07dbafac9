//! Pre-composed base canvases, one per skin.

use badge_common::{BadgeError, BadgeResult};
use image::{imageops, Rgba, RgbaImage};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

use crate::skin::SkinDefinition;

/// Cache of base canvases keyed by skin name.
///
/// A base canvas is the background color fill, the background image tiled
/// over the whole canvas, and the overlay painted once at the origin. Every
/// render starts from a copy of it.
#[derive(Default)]
pub struct SurfaceCache {
    bases: RwLock<HashMap<String, Arc<RgbaImage>>>,
}

impl SurfaceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Base canvas for `skin`, composing it on first use.
    pub fn get_or_build(&self, skin: &SkinDefinition) -> BadgeResult<Arc<RgbaImage>> {
        if let Some(found) = self
            .bases
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&skin.name)
        {
            return Ok(Arc::clone(found));
        }

        let mut bases = self.bases.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(found) = bases.get(&skin.name) {
            return Ok(Arc::clone(found));
        }

        let base = Arc::new(compose_base(skin)?);
        debug!(skin = %skin.name, "Composed base canvas");
        bases.insert(skin.name.clone(), Arc::clone(&base));
        Ok(base)
    }

    pub fn contains(&self, skin_name: &str) -> bool {
        self.bases
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(skin_name)
    }
}

/// Paint the static layers of a skin.
pub fn compose_base(skin: &SkinDefinition) -> BadgeResult<RgbaImage> {
    let fill = skin
        .background_color
        .map(|c| Rgba(c.to_rgba8()))
        .unwrap_or(Rgba([0, 0, 0, 0]));
    let mut canvas = RgbaImage::from_pixel(skin.width, skin.height, fill);

    if let Some(path) = &skin.background {
        let tile = load_image(path)?;
        tile_onto(&mut canvas, &tile);
    }

    if let Some(path) = &skin.overlay {
        let overlay = load_image(path)?;
        imageops::overlay(&mut canvas, &overlay, 0, 0);
    }

    Ok(canvas)
}

fn tile_onto(canvas: &mut RgbaImage, tile: &RgbaImage) {
    let (tw, th) = tile.dimensions();
    if tw == 0 || th == 0 {
        return;
    }

    for x in (0..canvas.width()).step_by(tw as usize) {
        for y in (0..canvas.height()).step_by(th as usize) {
            imageops::overlay(canvas, tile, x as i64, y as i64);
        }
    }
}

fn load_image(path: &Path) -> BadgeResult<RgbaImage> {
    image::open(path)
        .map(|img| img.to_rgba8())
        .map_err(|e| BadgeError::ImageLoad {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}
