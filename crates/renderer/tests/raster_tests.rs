//! Tests for the raster backend and its caches.
//!
//! Tests that draw text need a TrueType font and are skipped when none is
//! available (see `require_test_font!`).

use badge_common::{BadgeError, ColorScheme, ModeRow, PlayerStatSummary};
use image::Rgba;
use renderer::fonts::FontCache;
use renderer::surface::compose_base;
use renderer::{render, BadgeBackend, RasterBackend, SkinDefinition};
use std::collections::HashMap;
use std::sync::Arc;
use std::thread;
use test_utils::{
    legacy_skin, require_test_font, three_slot_skin, write_background_png, write_checker_png,
    write_skin,
};

fn sample_player() -> PlayerStatSummary {
    let rows = vec![ModeRow {
        game_type: "ctf".into(),
        elo: Some(1400),
        kills: 10,
        deaths: 5,
        wins: 3,
        losses: 1,
        alivetime_minutes: 61,
        ..ModeRow::default()
    }];
    PlayerStatSummary::from_mode_rows("^1Red^7White", None, &rows, ColorScheme::Xonotic)
}

fn skin_with_font(font: &std::path::Path) -> SkinDefinition {
    let doc = three_slot_skin(Some(font.to_str().unwrap()));
    SkinDefinition::from_json("default", &doc.to_string()).unwrap()
}

// ============================================================================
// Base canvases
// ============================================================================

#[test]
fn test_background_is_tiled() {
    let dir = tempfile::tempdir().unwrap();
    let a = [255, 0, 0, 255];
    let b = [0, 0, 255, 255];
    let tile = write_checker_png(dir.path(), "checker.png", 2, a, b);

    let skin = SkinDefinition {
        name: "tiled".into(),
        width: 5,
        height: 5,
        background: Some(tile),
        ..SkinDefinition::default()
    };
    let base = compose_base(&skin).unwrap();

    assert_eq!(base.dimensions(), (5, 5));
    assert_eq!(base.get_pixel(0, 0), &Rgba(a));
    assert_eq!(base.get_pixel(1, 0), &Rgba(b));
    assert_eq!(base.get_pixel(2, 0), &Rgba(a));
    assert_eq!(base.get_pixel(3, 2), &Rgba(b));
    assert_eq!(base.get_pixel(4, 4), &Rgba(a));
}

#[test]
fn test_overlay_painted_over_background() {
    let dir = tempfile::tempdir().unwrap();
    let bg = write_background_png(dir.path(), "bg.png", 8, 8, [0, 0, 0, 255]);
    let overlay = write_background_png(dir.path(), "overlay.png", 2, 2, [0, 255, 0, 255]);

    let skin = SkinDefinition {
        name: "layered".into(),
        width: 8,
        height: 8,
        background: Some(bg),
        overlay: Some(overlay),
        ..SkinDefinition::default()
    };
    let base = compose_base(&skin).unwrap();

    assert_eq!(base.get_pixel(1, 1), &Rgba([0, 255, 0, 255]));
    assert_eq!(base.get_pixel(5, 5), &Rgba([0, 0, 0, 255]));
}

#[test]
fn test_background_color_fill() {
    let skin = SkinDefinition::from_json("fill", &three_slot_skin(None).to_string()).unwrap();
    let base = compose_base(&skin).unwrap();
    assert_eq!(base.get_pixel(10, 10), &Rgba([0x20, 0x20, 0x20, 255]));
}

#[test]
fn test_missing_background_is_image_error() {
    let skin = SkinDefinition {
        name: "broken".into(),
        width: 4,
        height: 4,
        background: Some("/no/such/background.png".into()),
        ..SkinDefinition::default()
    };
    let err = compose_base(&skin).unwrap_err();
    assert!(matches!(err, BadgeError::ImageLoad { .. }));
    assert!(!err.is_fatal());
}

// ============================================================================
// Warm-up
// ============================================================================

#[test]
fn test_warm_up_reports_per_skin_failures() {
    let dir = tempfile::tempdir().unwrap();
    let mut bad_background = three_slot_skin(Some("/no/such/font.ttf"));
    bad_background["background"] = "/no/such/background.png".into();
    let bad_font = three_slot_skin(Some("/no/such/font.ttf"));

    write_skin(dir.path(), "bad_background", &bad_background);
    write_skin(dir.path(), "bad_font", &bad_font);
    let skins = renderer::load_skins(dir.path()).unwrap();

    let backend = RasterBackend::new();
    let mut failures: HashMap<String, BadgeError> = backend.warm_up(&skins).into_iter().collect();

    assert!(matches!(
        failures.remove("bad_background"),
        Some(BadgeError::ImageLoad { .. })
    ));
    let font_err = failures.remove("bad_font").unwrap();
    assert!(matches!(font_err, BadgeError::FontLoad { .. }));
    assert!(font_err.is_fatal());
}

#[test]
fn test_warm_up_flags_skin_without_font() {
    let skin = SkinDefinition::from_json("nofont", &three_slot_skin(None).to_string()).unwrap();
    let skins = HashMap::from([(skin.name.clone(), skin)]);

    let failures = RasterBackend::new().warm_up(&skins);
    assert_eq!(failures.len(), 1);
    assert!(matches!(failures[0].1, BadgeError::InvalidSkin { .. }));
}

#[test]
fn test_warm_up_populates_caches() {
    let font = require_test_font!();
    let skin = skin_with_font(&font);
    let skins = HashMap::from([(skin.name.clone(), skin)]);

    let backend = RasterBackend::new();
    assert!(backend.warm_up(&skins).is_empty());
    assert!(backend.surfaces().contains("default"));
    // distinct sizes in the sample skin: 22, 12, 10, 9, 8
    assert_eq!(backend.fonts().len(), 5);
}

// ============================================================================
// Font cache
// ============================================================================

#[test]
fn test_font_cache_builds_each_key_once() {
    let font = require_test_font!();
    let cache = FontCache::new();

    let a = cache.get(&font, 12.0).unwrap();
    let b = cache.get(&font, 12.0).unwrap();
    let c = cache.get(&font, 14.0).unwrap();

    assert!(Arc::ptr_eq(&a, &b));
    assert!(!Arc::ptr_eq(&a, &c));
    // one parsed face shared by both sizes
    assert!(Arc::ptr_eq(&a.font, &c.font));
    assert_eq!(cache.len(), 2);
}

#[test]
fn test_font_cache_concurrent_population() {
    let font = require_test_font!();
    let cache = Arc::new(FontCache::new());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let font = font.clone();
            thread::spawn(move || cache.get(&font, 18.0).unwrap())
        })
        .collect();
    let fonts: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert!(fonts.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_font_cache_missing_file() {
    let cache = FontCache::new();
    let err = cache
        .get(std::path::Path::new("/no/such/font.ttf"), 12.0)
        .err()
        .unwrap();
    assert!(matches!(err, BadgeError::FontLoad { .. }));
    assert!(cache.is_empty());
}

// ============================================================================
// Rendering
// ============================================================================

#[test]
fn test_render_png_badge() {
    let font = require_test_font!();
    let skin = skin_with_font(&font);
    let backend = RasterBackend::new();

    let png = render(&backend, &sample_player(), &skin).unwrap();
    let img = image::load_from_memory(&png).unwrap().to_rgba8();

    assert_eq!(img.dimensions(), (560, 70));
    let base = backend.surfaces().get_or_build(&skin).unwrap();
    let changed = img
        .pixels()
        .zip(base.pixels())
        .filter(|(a, b)| a != b)
        .count();
    assert!(changed > 100, "text should change pixels, changed={}", changed);
}

#[test]
fn test_render_rotated_text() {
    let font = require_test_font!();
    let mut doc = three_slot_skin(Some(font.to_str().unwrap()));
    doc["playing_time"]["angle"] = 90.into();
    let skin = SkinDefinition::from_json("rotated", &doc.to_string()).unwrap();

    let png = render(&RasterBackend::new(), &sample_player(), &skin).unwrap();
    let img = image::load_from_memory(&png).unwrap();
    assert_eq!((img.width(), img.height()), (560, 70));
}

#[test]
fn test_legacy_skin_renders() {
    let font = require_test_font!();
    let dir = tempfile::tempdir().unwrap();
    write_background_png(dir.path(), "bg.png", 16, 16, [40, 40, 80, 255]);
    write_skin(
        dir.path(),
        "old",
        &legacy_skin("bg.png", Some(font.to_str().unwrap())),
    );
    let skins = renderer::load_skins(dir.path()).unwrap();

    let backend = RasterBackend::new();
    assert!(backend.warm_up(&skins).is_empty());
    let png = render(&backend, &sample_player(), &skins["old"]).unwrap();
    let img = image::load_from_memory(&png).unwrap();
    assert_eq!((img.width(), img.height()), (200, 40));
}

#[test]
fn test_renders_share_base_canvas() {
    let font = require_test_font!();
    let skin = skin_with_font(&font);
    let backend = RasterBackend::new();

    let first = backend.surfaces().get_or_build(&skin).unwrap();
    render(&backend, &sample_player(), &skin).unwrap();
    let second = backend.surfaces().get_or_build(&skin).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    // the cached base is never drawn on
    assert_eq!(first.get_pixel(60, 20), &Rgba([0x20, 0x20, 0x20, 255]));
}
