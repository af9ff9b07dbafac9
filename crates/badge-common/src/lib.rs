//! Common types shared by the badge renderer and the generator service.

pub mod color;
pub mod duration;
pub mod error;
pub mod nick;
pub mod player;

pub use color::Rgb;
pub use duration::format_playing_time;
pub use error::{BadgeError, BadgeResult};
pub use nick::{ColorPart, ColorScheme, ColoredString};
pub use player::{EloEntry, ModeRow, PlayerStatSummary, RankEntry};
