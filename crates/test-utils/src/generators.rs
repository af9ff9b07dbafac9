//! Generators that write test assets to disk.
//!
//! Everything is written below a caller-provided directory, usually a
//! `tempfile::TempDir`, so tests clean up after themselves.

use image::{Rgba, RgbaImage};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Writes a solid-color PNG and returns its path.
pub fn write_background_png(dir: &Path, name: &str, width: u32, height: u32, rgba: [u8; 4]) -> PathBuf {
    let path = dir.join(name);
    RgbaImage::from_pixel(width, height, Rgba(rgba))
        .save(&path)
        .expect("Failed to write background image");
    path
}

/// Writes a two-color checkerboard PNG, useful for checking tiling.
pub fn write_checker_png(dir: &Path, name: &str, size: u32, a: [u8; 4], b: [u8; 4]) -> PathBuf {
    let path = dir.join(name);
    let img = RgbaImage::from_fn(size, size, |x, y| {
        if (x + y) % 2 == 0 {
            Rgba(a)
        } else {
            Rgba(b)
        }
    });
    img.save(&path).expect("Failed to write checker image");
    path
}

/// Writes a skin document as `<dir>/<name>.json`.
pub fn write_skin(dir: &Path, name: &str, skin: &Value) -> PathBuf {
    write_json(dir.join(format!("{}.json", name)), skin)
}

/// Writes a player record as `<dir>/<id>.json`.
pub fn write_player(dir: &Path, id: i64, record: &Value) -> PathBuf {
    write_json(dir.join(format!("{}.json", id)), record)
}

/// Writes raw text, e.g. a deliberately malformed document.
pub fn write_text(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("Failed to write test file");
    path
}

/// Lists files below `dir` (recursively) as paths relative to it, sorted.
pub fn list_files(dir: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    collect_files(dir, dir, &mut out);
    out.sort();
    out
}

fn collect_files(root: &Path, dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_files(root, &path, out);
        } else if let Ok(rel) = path.strip_prefix(root) {
            out.push(rel.to_path_buf());
        }
    }
}

fn write_json(path: PathBuf, value: &Value) -> PathBuf {
    let text = serde_json::to_string_pretty(value).expect("Failed to serialize test document");
    fs::write(&path, text).expect("Failed to write test document");
    path
}
