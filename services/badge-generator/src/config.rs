//! Generator configuration.

use badge_common::{BadgeError, BadgeResult};
use renderer::png::DEFAULT_JPEG_QUALITY;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming the config file when `--config` is absent.
pub const CONFIG_ENV: &str = "BADGE_CONFIG";
/// Config file used when neither `--config` nor `BADGE_CONFIG` is set.
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Encoded format of the files written for the raster backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg,
}

/// Top-level generator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Directory holding one skin document per file
    pub skins_dir: PathBuf,

    /// Badges land in `<output_dir>/<skin>/<player-id>.<ext>`
    pub output_dir: PathBuf,

    /// Directory of `<player-id>.json` stat records
    pub players_dir: PathBuf,

    pub output_format: OutputFormat,

    /// Quality used when transcoding to JPEG (1-100)
    pub jpeg_quality: u8,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            skins_dir: PathBuf::from("skins"),
            output_dir: PathBuf::from("output"),
            players_dir: PathBuf::from("players"),
            output_format: OutputFormat::Png,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl GeneratorConfig {
    /// Load the configuration the way the binary does.
    ///
    /// The file is `explicit` if given, else `$BADGE_CONFIG`, else
    /// `./config.json`. A missing file means defaults; a file that exists but
    /// does not parse is an error. Environment overrides are applied last.
    pub fn load(explicit: Option<&Path>) -> BadgeResult<Self> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| env::var_os(CONFIG_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

        let mut config = Self::from_path_or_default(&path)?;
        config.apply_overrides(|key| env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse `path`, or fall back to defaults when it does not exist.
    pub fn from_path_or_default(path: &Path) -> BadgeResult<Self> {
        if !path.exists() {
            warn!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }
        let config = Self::from_path(path)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Parse a JSON or YAML config file, chosen by extension.
    pub fn from_path(path: &Path) -> BadgeResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            BadgeError::ConfigError(format!("{}: {}", path.display(), e))
        })?;

        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        let parsed = if is_yaml {
            serde_yaml::from_str(&content).map_err(|e| e.to_string())
        } else {
            serde_json::from_str(&content).map_err(|e| e.to_string())
        };

        parsed.map_err(|e| BadgeError::ConfigError(format!("{}: {}", path.display(), e)))
    }

    /// Replace directories with `BADGE_SKINS_DIR`, `BADGE_OUTPUT_DIR` and
    /// `BADGE_PLAYERS_DIR` when `lookup` yields a non-empty value.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let targets = [
            ("BADGE_SKINS_DIR", &mut self.skins_dir),
            ("BADGE_OUTPUT_DIR", &mut self.output_dir),
            ("BADGE_PLAYERS_DIR", &mut self.players_dir),
        ];
        for (key, slot) in targets {
            if let Some(value) = lookup(key).filter(|v| !v.is_empty()) {
                *slot = PathBuf::from(value);
            }
        }
    }

    pub fn validate(&self) -> BadgeResult<()> {
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(BadgeError::ConfigError(format!(
                "jpeg_quality must be within 1-100, got {}",
                self.jpeg_quality
            )));
        }
        Ok(())
    }
}
