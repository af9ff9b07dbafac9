//! Font face cache keyed by font file and point size.

use badge_common::{BadgeError, BadgeResult};
use rusttype::{Font, Scale, VMetrics};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

/// A loaded font at one point size.
pub struct SizedFont {
    pub font: Arc<Font<'static>>,
    pub scale: Scale,
    pub v_metrics: VMetrics,
}

/// Cache of parsed font files and their sized handles.
///
/// Lookups take a read lock. A miss takes the write lock and checks again
/// before loading, so each file is parsed once and each (file, size) pair is
/// built once no matter how many renders ask for it concurrently.
#[derive(Default)]
pub struct FontCache {
    faces: RwLock<HashMap<PathBuf, Arc<Font<'static>>>>,
    sized: RwLock<HashMap<(PathBuf, u32), Arc<SizedFont>>>,
}

impl FontCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Font at `path` scaled so that one em is `size` pixels.
    pub fn get(&self, path: &Path, size: f32) -> BadgeResult<Arc<SizedFont>> {
        let key = (path.to_path_buf(), size.to_bits());

        if let Some(found) = self
            .sized
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Ok(Arc::clone(found));
        }

        let mut sized = self.sized.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(found) = sized.get(&key) {
            return Ok(Arc::clone(found));
        }

        let font = self.face(path)?;
        let scale = em_scale(&font, size);
        let handle = Arc::new(SizedFont {
            v_metrics: font.v_metrics(scale),
            font,
            scale,
        });
        sized.insert(key, Arc::clone(&handle));
        Ok(handle)
    }

    /// Number of (file, size) handles built so far.
    pub fn len(&self) -> usize {
        self.sized
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn face(&self, path: &Path) -> BadgeResult<Arc<Font<'static>>> {
        if let Some(found) = self
            .faces
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
        {
            return Ok(Arc::clone(found));
        }

        let mut faces = self.faces.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(found) = faces.get(path) {
            return Ok(Arc::clone(found));
        }

        let font = Arc::new(load_font(path)?);
        debug!(path = ?path, "Loaded font");
        faces.insert(path.to_path_buf(), Arc::clone(&font));
        Ok(font)
    }
}

fn load_font(path: &Path) -> BadgeResult<Font<'static>> {
    let bytes = fs::read(path).map_err(|e| BadgeError::FontLoad {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    Font::try_from_vec(bytes).ok_or_else(|| BadgeError::FontLoad {
        path: path.to_path_buf(),
        message: "not a usable TrueType/OpenType font".to_string(),
    })
}

/// rusttype scales by line height; convert a point size (em height) to that.
fn em_scale(font: &Font<'_>, size: f32) -> Scale {
    let units_per_em = font.units_per_em() as f32;
    let unscaled = font.v_metrics_unscaled();
    let line_height = unscaled.ascent - unscaled.descent;

    if units_per_em > 0.0 && line_height > 0.0 {
        Scale::uniform(size * line_height / units_per_em)
    } else {
        Scale::uniform(size)
    }
}
