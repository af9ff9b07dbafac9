//! Badge rendering.
//!
//! - Skin definitions and the skin directory loader
//! - The badge engine, written against the [`BadgeBackend`] / [`TextCanvas`] traits
//! - A raster backend (rusttype + imageproc, PNG output) with font and base canvas caches
//! - A layout-recording backend that dumps placed text as JSON

pub mod backend;
pub mod badge;
pub mod fonts;
pub mod gradient;
pub mod layout;
pub mod png;
pub mod raster;
pub mod recorder;
pub mod skin;
pub mod surface;

pub use backend::{BadgeBackend, TextCanvas};
pub use badge::{render, render_badge, NO_STATS_TEXT, PRELIMINARY_TEXT};
pub use layout::{TextExtents, TextStyle};
pub use raster::RasterBackend;
pub use recorder::{DrawOp, LayoutBackend, LayoutDump};
pub use skin::{load_skins, Align, Position, SkinDefinition, TextPlacement};
