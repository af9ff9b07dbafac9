//! Batch badge generation.
//!
//! Loads skins, picks players from a stat source and renders one badge per
//! (player, skin) pair with a pool of async workers.

pub mod config;
pub mod dispatch;
pub mod output;
pub mod source;

pub use config::{GeneratorConfig, OutputFormat};
pub use dispatch::{warm_up_skins, DispatchReport, Dispatcher};
pub use output::OutputLayout;
pub use source::{activity_window, JsonDirectorySource, PlayerDataSource, PlayerRecord};
