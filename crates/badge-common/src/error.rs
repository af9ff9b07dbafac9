//! Error types for the badge generator.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using BadgeError.
pub type BadgeResult<T> = Result<T, BadgeError>;

/// Primary error type for badge operations.
#[derive(Debug, Error)]
pub enum BadgeError {
    // === Setup Errors ===
    #[error("Skin directory unreadable: {path}: {message}")]
    SkinDirectory { path: PathBuf, message: String },

    #[error("No skins could be loaded from {0}")]
    NoSkins(PathBuf),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    // === Skin Errors ===
    #[error("Invalid skin definition {path}: {message}")]
    InvalidSkin { path: PathBuf, message: String },

    #[error("Skin not found: {0}")]
    SkinNotFound(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    // === Asset Errors ===
    #[error("Failed to load font {path}: {message}")]
    FontLoad { path: PathBuf, message: String },

    #[error("Failed to load image {path}: {message}")]
    ImageLoad { path: PathBuf, message: String },

    // === Rendering Errors ===
    #[error("Rendering failed: {0}")]
    RenderError(String),

    #[error("Encoding failed: {0}")]
    EncodeError(String),

    // === Data Errors ===
    #[error("Stat fetch failed for player {player_id}: {message}")]
    FetchError { player_id: i64, message: String },

    #[error("Player lookup failed: {0}")]
    SourceError(String),

    // === Infrastructure Errors ===
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BadgeError {
    /// Whether this error aborts the whole batch.
    ///
    /// Setup problems (no skins, unusable fonts during warm-up, a broken
    /// player source) are fatal. Everything else only costs the unit of work
    /// it happened in: one player, one skin or one output file. Inside a
    /// single render every error, font errors included, skips just that file.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            BadgeError::SkinDirectory { .. }
                | BadgeError::NoSkins(_)
                | BadgeError::ConfigError(_)
                | BadgeError::FontLoad { .. }
                | BadgeError::SourceError(_)
        )
    }
}
