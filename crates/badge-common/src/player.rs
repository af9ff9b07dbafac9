//! Aggregate player statistics shown on a badge.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::duration::format_playing_time;
use crate::nick::{ColorScheme, ColoredString};

/// Game types whose matches have no winner, so wins and losses are not counted.
pub const NO_WIN_LOSS_GAME_TYPES: &[&str] = &["CTS"];

/// Rating for one game type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EloEntry {
    pub game_type: String,
    pub elo: i64,
}

/// Leaderboard position for one game type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankEntry {
    pub game_type: String,
    pub rank: i64,
    pub max_rank: i64,
}

/// One per-game-type aggregate row, as produced by the stats query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModeRow {
    pub game_type: String,
    #[serde(default)]
    pub elo: Option<i64>,
    #[serde(default)]
    pub rank: Option<i64>,
    #[serde(default)]
    pub max_rank: Option<i64>,
    #[serde(default)]
    pub wins: u64,
    #[serde(default)]
    pub losses: u64,
    #[serde(default)]
    pub kills: u64,
    #[serde(default)]
    pub deaths: u64,
    /// Time alive in minutes
    #[serde(default)]
    pub alivetime_minutes: u64,
}

/// Everything a badge displays for one player.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerStatSummary {
    pub nick: ColoredString,
    pub stripped_nick: String,
    /// Highest rating first
    pub elos: Vec<EloEntry>,
    /// `None` when no rank data exists for the player at all
    pub ranks: Option<Vec<RankEntry>>,
    pub kills: u64,
    pub deaths: u64,
    pub wins: u64,
    pub losses: u64,
    pub playing_time: Duration,
}

impl PlayerStatSummary {
    /// The "no data for this player" sentinel.
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when there is nothing to render for this player.
    pub fn is_empty(&self) -> bool {
        self.nick.is_empty()
    }

    /// Build a summary from per-game-type rows.
    ///
    /// Kills, deaths and playing time are summed over every row; wins and
    /// losses skip game types without a win/loss outcome. Ratings and ranks
    /// are only collected where present, and ratings end up sorted
    /// descending with ranks following the same order.
    pub fn from_mode_rows(
        raw_nick: &str,
        stripped_nick: Option<&str>,
        rows: &[ModeRow],
        scheme: ColorScheme,
    ) -> Self {
        if rows.is_empty() {
            return Self::empty();
        }

        let nick = ColoredString::parse(raw_nick, scheme);
        let stripped_nick = stripped_nick
            .map(str::to_string)
            .unwrap_or_else(|| nick.stripped().to_string());

        let mut ordered: Vec<&ModeRow> = rows.iter().collect();
        ordered.sort_by(|a, b| b.elo.cmp(&a.elo));

        let mut summary = Self {
            nick,
            stripped_nick,
            ..Self::default()
        };

        let mut ranks = Vec::new();
        for row in ordered {
            let game_type = row.game_type.to_uppercase();

            if let Some(elo) = row.elo {
                summary.elos.push(EloEntry {
                    game_type: game_type.clone(),
                    elo,
                });
            }
            if let (Some(rank), Some(max_rank)) = (row.rank, row.max_rank) {
                ranks.push(RankEntry {
                    game_type: game_type.clone(),
                    rank,
                    max_rank,
                });
            }

            summary.kills += row.kills;
            summary.deaths += row.deaths;
            summary.playing_time += Duration::from_secs(row.alivetime_minutes * 60);

            if !NO_WIN_LOSS_GAME_TYPES.contains(&game_type.as_str()) {
                summary.wins += row.wins;
                summary.losses += row.losses;
            }
        }

        summary.ranks = if ranks.is_empty() { None } else { Some(ranks) };
        summary
    }

    /// Kills per death; 0 when the player never died.
    pub fn kd_ratio(&self) -> f64 {
        if self.deaths > 0 {
            self.kills as f64 / self.deaths as f64
        } else {
            0.0
        }
    }

    /// Percentage of decided games won; 0 when none were played.
    pub fn win_pct(&self) -> f64 {
        let total = self.wins + self.losses;
        if total > 0 {
            self.wins as f64 / total as f64 * 100.0
        } else {
            0.0
        }
    }

    pub fn playing_time_string(&self) -> String {
        format_playing_time(self.playing_time)
    }
}
