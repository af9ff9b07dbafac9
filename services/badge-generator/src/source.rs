//! Where player statistics come from.

use async_trait::async_trait;
use badge_common::{BadgeError, BadgeResult, ColorScheme, ModeRow, PlayerStatSummary};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Player IDs up to this value are reserved (anonymous and bot players).
pub const MAX_RESERVED_PLAYER_ID: i64 = 2;

/// Activity window for a player lookup: `None` selects every player.
///
/// `--all` and a zero-hour delta both mean no window.
pub fn activity_window(all: bool, delta_hours: u32) -> Option<u32> {
    if all || delta_hours == 0 {
        None
    } else {
        Some(delta_hours)
    }
}

/// Read access to player statistics.
#[async_trait]
pub trait PlayerDataSource: Send + Sync {
    /// IDs of players that should get badges, ascending.
    ///
    /// With an activity window only players active within the last
    /// `activity_window_hours` are returned; `None` means every player.
    async fn find_players(
        &self,
        activity_window_hours: Option<u32>,
        limit: Option<usize>,
    ) -> BadgeResult<Vec<i64>>;

    /// Stats for one player, or the empty summary when there are none.
    async fn get_player_data(&self, player_id: i64) -> BadgeResult<PlayerStatSummary>;
}

/// One player's stats as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub nick: String,
    #[serde(default)]
    pub stripped_nick: Option<String>,
    #[serde(default)]
    pub last_active: Option<DateTime<Utc>>,
    #[serde(default)]
    pub modes: Vec<ModeRow>,
}

impl PlayerRecord {
    pub fn into_summary(self, scheme: ColorScheme) -> PlayerStatSummary {
        PlayerStatSummary::from_mode_rows(
            &self.nick,
            self.stripped_nick.as_deref(),
            &self.modes,
            scheme,
        )
    }

    /// Whether the player was seen at or after `cutoff`.
    fn active_since(&self, cutoff: DateTime<Utc>) -> bool {
        self.last_active.map_or(false, |ts| ts >= cutoff)
    }
}

/// A directory of `<player-id>.json` records.
#[derive(Debug, Clone)]
pub struct JsonDirectorySource {
    dir: PathBuf,
    scheme: ColorScheme,
}

impl JsonDirectorySource {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self {
            dir: dir.into(),
            scheme: ColorScheme::default(),
        }
    }

    pub fn with_scheme(mut self, scheme: ColorScheme) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, player_id: i64) -> PathBuf {
        self.dir.join(format!("{}.json", player_id))
    }

    async fn read_record(&self, path: &Path) -> Result<Option<PlayerRecord>, String> {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.to_string()),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| e.to_string())
    }

    /// Numeric file stems in the directory, reserved IDs excluded.
    async fn list_ids(&self) -> BadgeResult<Vec<i64>> {
        let mut entries = tokio::fs::read_dir(&self.dir).await.map_err(|e| {
            BadgeError::SourceError(format!("{}: {}", self.dir.display(), e))
        })?;

        let mut ids = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| BadgeError::SourceError(e.to_string()))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match path.file_stem().and_then(|s| s.to_str()).map(str::parse::<i64>) {
                Some(Ok(id)) if id > MAX_RESERVED_PLAYER_ID => ids.push(id),
                Some(Ok(_)) => {}
                _ => debug!(path = %path.display(), "Ignoring non-player file"),
            }
        }
        Ok(ids)
    }
}

#[async_trait]
impl PlayerDataSource for JsonDirectorySource {
    async fn find_players(
        &self,
        activity_window_hours: Option<u32>,
        limit: Option<usize>,
    ) -> BadgeResult<Vec<i64>> {
        let mut ids = self.list_ids().await?;
        ids.sort_unstable();

        if let Some(hours) = activity_window_hours {
            let cutoff = Utc::now() - Duration::hours(i64::from(hours));
            let mut active = Vec::with_capacity(ids.len());
            for id in ids {
                match self.read_record(&self.record_path(id)).await {
                    Ok(Some(record)) if record.active_since(cutoff) => active.push(id),
                    Ok(_) => {}
                    Err(e) => warn!(player_id = id, error = %e, "Unreadable player record"),
                }
            }
            ids = active;
        }

        if let Some(limit) = limit {
            ids.truncate(limit);
        }
        Ok(ids)
    }

    async fn get_player_data(&self, player_id: i64) -> BadgeResult<PlayerStatSummary> {
        match self.read_record(&self.record_path(player_id)).await {
            Ok(Some(record)) => Ok(record.into_summary(self.scheme)),
            Ok(None) => Ok(PlayerStatSummary::empty()),
            Err(message) => Err(BadgeError::FetchError { player_id, message }),
        }
    }
}
