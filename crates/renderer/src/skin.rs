//! Skin definitions: the declarative description of one badge theme.
//!
//! A skin is loaded from a JSON or YAML document whose file stem becomes the
//! skin name. Keys are snake_case; the PascalCase keys of older skin files
//! (`NickConfig`, `FontSize`, `Pos`, ...) are accepted as aliases.

use badge_common::{BadgeError, BadgeResult, Rgb};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Default nickname lightness band.
pub const DEFAULT_LIGHTNESS_FLOOR: f64 = 0.4;
pub const DEFAULT_LIGHTNESS_CEILING: f64 = 1.0;

/// Horizontal alignment of a text element relative to its anchor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

impl TryFrom<String> for Align {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "left" | "start" => Ok(Align::Left),
            "center" | "centre" | "middle" => Ok(Align::Center),
            "right" | "end" => Ok(Align::Right),
            other => Err(format!("unknown alignment '{}'", other)),
        }
    }
}

/// Anchor point in canvas pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Position {
    #[serde(alias = "X")]
    pub x: f32,
    #[serde(alias = "Y")]
    pub y: f32,
}

/// Where and how one text element is drawn.
///
/// A placement is a template shared by every render of its skin; per-render
/// values are derived from it, never written back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextPlacement {
    /// Font file; falls back to the skin font when unset
    #[serde(alias = "Font")]
    pub font: Option<PathBuf>,

    /// Point size; zero or less disables the element
    #[serde(alias = "FontSize")]
    pub font_size: f32,

    #[serde(alias = "Pos")]
    pub pos: Position,

    /// One color for plain text, high/mid/low for shaded metrics
    #[serde(alias = "Color")]
    pub color: Vec<Rgb>,

    /// Rotation in degrees, clockwise
    #[serde(alias = "Angle")]
    pub angle: f32,

    #[serde(alias = "Align")]
    pub align: Align,

    /// Shrink the text until it fits this many pixels
    #[serde(alias = "MaxWidth")]
    pub max_width: Option<f32>,

    /// Align within `[x, x + width]` instead of around the anchor
    #[serde(alias = "Width")]
    pub width: Option<f32>,
}

impl TextPlacement {
    pub fn is_enabled(&self) -> bool {
        self.font_size > 0.0
    }

    /// First configured color, white when none is given.
    pub fn primary_color(&self) -> Rgb {
        self.color.first().copied().unwrap_or(Rgb::WHITE)
    }

    /// High, mid and low colors for gradient shading, if configured.
    pub fn shade_colors(&self) -> Option<(Rgb, Rgb, Rgb)> {
        match self.color.as_slice() {
            [high, mid, low, ..] => Some((*high, *mid, *low)),
            _ => None,
        }
    }

    /// Maximum width, ignoring the non-positive values older files use for "unset".
    pub fn max_width(&self) -> Option<f32> {
        self.max_width.filter(|w| *w > 0.0)
    }

    pub fn box_width(&self) -> Option<f32> {
        self.width.filter(|w| *w > 0.0)
    }

    fn resolve_paths(&mut self, base: &Path) {
        self.font = resolve_path(self.font.take(), base);
    }
}

/// One visual theme for a badge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkinDefinition {
    /// Unique key, taken from the file stem
    #[serde(skip)]
    pub name: String,

    #[serde(alias = "Width")]
    pub width: u32,
    #[serde(alias = "Height")]
    pub height: u32,

    /// Solid fill painted under the background image
    #[serde(alias = "BackgroundColor")]
    pub background_color: Option<Rgb>,

    /// Image tiled across the canvas
    #[serde(alias = "Background")]
    pub background: Option<PathBuf>,

    /// Image painted once at the origin, over the background
    #[serde(alias = "Overlay")]
    pub overlay: Option<PathBuf>,

    /// Default font for every placement without its own
    #[serde(alias = "Font")]
    pub font: Option<PathBuf>,

    /// Number of rating/rank slots; defaults to the number of rating placements
    #[serde(alias = "NumGameTypes")]
    pub num_game_types: Option<usize>,

    #[serde(alias = "NickLightnessFloor")]
    pub nick_lightness_floor: f64,
    #[serde(alias = "NickLightnessCeiling")]
    pub nick_lightness_ceiling: f64,

    #[serde(alias = "NickConfig")]
    pub nick: TextPlacement,
    #[serde(alias = "NoStatsConfig")]
    pub no_stats: TextPlacement,
    #[serde(alias = "GameTypeConfig")]
    pub game_type: Vec<TextPlacement>,
    #[serde(alias = "EloConfig")]
    pub elo: Vec<TextPlacement>,
    #[serde(alias = "RankConfig")]
    pub rank: Vec<TextPlacement>,
    #[serde(alias = "WinPctLabelConfig")]
    pub win_pct_label: TextPlacement,
    #[serde(alias = "WinPctConfig")]
    pub win_pct: TextPlacement,
    #[serde(alias = "WinConfig")]
    pub wins: TextPlacement,
    #[serde(alias = "LossConfig")]
    pub losses: TextPlacement,
    #[serde(alias = "KDRatioLabelConfig")]
    pub kd_ratio_label: TextPlacement,
    #[serde(alias = "KDRatio", alias = "KDRatioConfig")]
    pub kd_ratio: TextPlacement,
    #[serde(alias = "KillsConfig")]
    pub kills: TextPlacement,
    #[serde(alias = "DeathsConfig")]
    pub deaths: TextPlacement,
    #[serde(alias = "PlayingTimeConfig")]
    pub playing_time: TextPlacement,
}

impl Default for SkinDefinition {
    fn default() -> Self {
        Self {
            name: String::new(),
            width: 0,
            height: 0,
            background_color: None,
            background: None,
            overlay: None,
            font: None,
            num_game_types: None,
            nick_lightness_floor: DEFAULT_LIGHTNESS_FLOOR,
            nick_lightness_ceiling: DEFAULT_LIGHTNESS_CEILING,
            nick: TextPlacement::default(),
            no_stats: TextPlacement::default(),
            game_type: Vec::new(),
            elo: Vec::new(),
            rank: Vec::new(),
            win_pct_label: TextPlacement::default(),
            win_pct: TextPlacement::default(),
            wins: TextPlacement::default(),
            losses: TextPlacement::default(),
            kd_ratio_label: TextPlacement::default(),
            kd_ratio: TextPlacement::default(),
            kills: TextPlacement::default(),
            deaths: TextPlacement::default(),
            playing_time: TextPlacement::default(),
        }
    }
}

impl SkinDefinition {
    /// Parse a skin from a JSON document.
    pub fn from_json(name: &str, json: &str) -> BadgeResult<Self> {
        let mut skin: SkinDefinition =
            serde_json::from_str(json).map_err(|e| invalid(name, e.to_string()))?;
        skin.name = name.to_string();
        skin.validate()?;
        Ok(skin)
    }

    /// Parse a skin from a YAML document.
    pub fn from_yaml(name: &str, yaml: &str) -> BadgeResult<Self> {
        let mut skin: SkinDefinition =
            serde_yaml::from_str(yaml).map_err(|e| invalid(name, e.to_string()))?;
        skin.name = name.to_string();
        skin.validate()?;
        Ok(skin)
    }

    /// Load a skin file, naming it after the file stem.
    ///
    /// Relative image and font paths are resolved against the file's directory.
    pub fn from_path(path: &Path) -> BadgeResult<Self> {
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| BadgeError::InvalidSkin {
                path: path.to_path_buf(),
                message: "file name is not valid UTF-8".to_string(),
            })?;

        let contents = fs::read_to_string(path).map_err(|e| BadgeError::InvalidSkin {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let parsed = match extension(path).as_deref() {
            Some("yaml") | Some("yml") => Self::from_yaml(name, &contents),
            _ => Self::from_json(name, &contents),
        };

        let mut skin = parsed.map_err(|e| match e {
            BadgeError::InvalidSkin { message, .. } => BadgeError::InvalidSkin {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })?;

        if let Some(base) = path.parent() {
            skin.resolve_paths(base);
        }
        Ok(skin)
    }

    /// Check the definition is renderable.
    pub fn validate(&self) -> BadgeResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(invalid(
                &self.name,
                format!("canvas size must be positive, got {}x{}", self.width, self.height),
            ));
        }

        let band = 0.0..=1.0;
        if !band.contains(&self.nick_lightness_floor)
            || !band.contains(&self.nick_lightness_ceiling)
            || self.nick_lightness_floor > self.nick_lightness_ceiling
        {
            return Err(invalid(
                &self.name,
                format!(
                    "nick lightness band [{}, {}] is not within [0, 1]",
                    self.nick_lightness_floor, self.nick_lightness_ceiling
                ),
            ));
        }

        Ok(())
    }

    /// Number of rating/rank slots this skin draws.
    ///
    /// Never exceeds the number of rating placements.
    pub fn slot_count(&self) -> usize {
        self.num_game_types
            .unwrap_or(self.elo.len())
            .min(self.elo.len())
    }

    /// Whether nickname colors need lightness capping at all.
    pub fn caps_nick_lightness(&self) -> bool {
        self.nick_lightness_floor > 0.0 || self.nick_lightness_ceiling < 1.0
    }

    /// Font file for a placement: its own, else the skin default.
    pub fn font_for<'a>(&'a self, placement: &'a TextPlacement) -> Option<&'a Path> {
        placement
            .font
            .as_deref()
            .or(self.font.as_deref())
            .filter(|p| !p.as_os_str().is_empty())
    }

    /// Every placement in the skin, slot arrays included.
    pub fn placements(&self) -> impl Iterator<Item = &TextPlacement> {
        [
            &self.nick,
            &self.no_stats,
            &self.win_pct_label,
            &self.win_pct,
            &self.wins,
            &self.losses,
            &self.kd_ratio_label,
            &self.kd_ratio,
            &self.kills,
            &self.deaths,
            &self.playing_time,
        ]
        .into_iter()
        .chain(self.game_type.iter())
        .chain(self.elo.iter())
        .chain(self.rank.iter())
    }

    fn resolve_paths(&mut self, base: &Path) {
        self.background = resolve_path(self.background.take(), base);
        self.overlay = resolve_path(self.overlay.take(), base);
        self.font = resolve_path(self.font.take(), base);

        for placement in [
            &mut self.nick,
            &mut self.no_stats,
            &mut self.win_pct_label,
            &mut self.win_pct,
            &mut self.wins,
            &mut self.losses,
            &mut self.kd_ratio_label,
            &mut self.kd_ratio,
            &mut self.kills,
            &mut self.deaths,
            &mut self.playing_time,
        ] {
            placement.resolve_paths(base);
        }
        for placement in self
            .game_type
            .iter_mut()
            .chain(self.elo.iter_mut())
            .chain(self.rank.iter_mut())
        {
            placement.resolve_paths(base);
        }
    }
}

/// Load every skin definition in a directory, keyed by name.
///
/// Files ending in `.json`, `.yaml` or `.yml` are considered. A file that
/// fails to parse or validate is logged and skipped. An unreadable directory,
/// or one without a single usable skin, is an error.
pub fn load_skins<P: AsRef<Path>>(dir: P) -> BadgeResult<HashMap<String, SkinDefinition>> {
    let dir = dir.as_ref();

    let entries = fs::read_dir(dir).map_err(|e| BadgeError::SkinDirectory {
        path: dir.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut paths: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && matches!(
                    extension(path).as_deref(),
                    Some("json") | Some("yaml") | Some("yml")
                )
        })
        .collect();
    paths.sort();

    let mut skins = HashMap::new();
    for path in paths {
        match SkinDefinition::from_path(&path) {
            Ok(skin) => {
                debug!(
                    skin = %skin.name,
                    width = skin.width,
                    height = skin.height,
                    slots = skin.slot_count(),
                    "Loaded skin"
                );
                if let Some(previous) = skins.insert(skin.name.clone(), skin) {
                    warn!(skin = %previous.name, path = ?path, "Duplicate skin name, later file wins");
                }
            }
            Err(e) => {
                warn!(error = %e, path = ?path, "Skipping unusable skin file");
            }
        }
    }

    if skins.is_empty() {
        return Err(BadgeError::NoSkins(dir.to_path_buf()));
    }

    info!(
        count = skins.len(),
        skins = ?skins.keys().collect::<Vec<_>>(),
        "Loaded skins"
    );
    Ok(skins)
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase())
}

/// Empty paths mean "unset"; relative ones are joined onto `base`.
fn resolve_path(path: Option<PathBuf>, base: &Path) -> Option<PathBuf> {
    let path = path.filter(|p| !p.as_os_str().is_empty())?;
    if path.is_relative() {
        Some(base.join(path))
    } else {
        Some(path)
    }
}

fn invalid(name: &str, message: String) -> BadgeError {
    BadgeError::InvalidSkin {
        path: PathBuf::from(name),
        message,
    }
}
