//! Concurrent render dispatcher.
//!
//! A producer feeds player IDs into a bounded channel; a fixed pool of
//! worker tasks shares the receiving end. Each worker fetches one player's
//! stats, renders a badge per skin on the blocking pool and writes the
//! results. Nothing mutable is shared between workers except the channel.

use badge_common::{BadgeError, BadgeResult, PlayerStatSummary};
use futures::future::join_all;
use renderer::{render, BadgeBackend, SkinDefinition};
use std::collections::HashMap;
use std::ops::AddAssign;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, error, info, warn};

use crate::output::OutputLayout;
use crate::source::PlayerDataSource;

/// Player IDs queued per worker.
const QUEUE_DEPTH_PER_WORKER: usize = 2;

/// Totals for one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Players with data that went through rendering
    pub players_processed: usize,
    /// Players with no data (empty nickname)
    pub players_skipped: usize,
    pub fetch_failures: usize,
    pub files_written: usize,
    /// Badges that failed to render, encode or write
    pub render_failures: usize,
}

impl AddAssign for DispatchReport {
    fn add_assign(&mut self, other: Self) {
        self.players_processed += other.players_processed;
        self.players_skipped += other.players_skipped;
        self.fetch_failures += other.fetch_failures;
        self.files_written += other.files_written;
        self.render_failures += other.render_failures;
    }
}

/// Warm `backend` up for `skins` and keep only the usable ones, sorted by name.
///
/// A fatal failure (an unloadable font) aborts; anything else drops just
/// that skin with a warning.
pub fn warm_up_skins(
    backend: &dyn BadgeBackend,
    mut skins: HashMap<String, SkinDefinition>,
    skins_dir: &Path,
) -> BadgeResult<Vec<SkinDefinition>> {
    for (name, err) in backend.warm_up(&skins) {
        if err.is_fatal() {
            error!(skin = %name, error = %err, "Skin warm-up failed");
            return Err(err);
        }
        warn!(skin = %name, error = %err, "Dropping skin");
        skins.remove(&name);
    }

    if skins.is_empty() {
        return Err(BadgeError::NoSkins(skins_dir.to_path_buf()));
    }

    let mut usable: Vec<SkinDefinition> = skins.into_values().collect();
    usable.sort_by(|a, b| a.name.cmp(&b.name));
    info!(
        backend = backend.name(),
        count = usable.len(),
        "Skins ready"
    );
    Ok(usable)
}

struct Shared {
    backend: Arc<dyn BadgeBackend>,
    source: Arc<dyn PlayerDataSource>,
    skins: Vec<Arc<SkinDefinition>>,
    output: OutputLayout,
}

/// Renders every (player, skin) pair with a fixed number of workers.
pub struct Dispatcher {
    shared: Arc<Shared>,
    workers: usize,
}

impl Dispatcher {
    /// `skins` must already be warmed up on `backend`, and their output
    /// directories prepared.
    pub fn new(
        backend: Arc<dyn BadgeBackend>,
        source: Arc<dyn PlayerDataSource>,
        skins: Vec<SkinDefinition>,
        output: OutputLayout,
        workers: usize,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                backend,
                source,
                skins: skins.into_iter().map(Arc::new).collect(),
                output,
            }),
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Process `player_ids` and return once every worker has finished.
    pub async fn run(&self, player_ids: Vec<i64>) -> DispatchReport {
        let total = player_ids.len();
        info!(players = total, workers = self.workers, "Starting dispatch");

        let (tx, rx) = mpsc::channel::<i64>(self.workers * QUEUE_DEPTH_PER_WORKER);
        let rx = Arc::new(Mutex::new(rx));

        let producer = tokio::spawn(async move {
            for id in player_ids {
                if tx.send(id).await.is_err() {
                    break;
                }
            }
            // dropping tx closes the channel
        });

        let handles: Vec<_> = (0..self.workers)
            .map(|worker| {
                let shared = Arc::clone(&self.shared);
                let rx = Arc::clone(&rx);
                tokio::spawn(work(worker, shared, rx))
            })
            .collect();

        let mut report = DispatchReport::default();
        for result in join_all(handles).await {
            match result {
                Ok(partial) => report += partial,
                Err(e) => error!(error = %e, "Worker task failed"),
            }
        }
        if let Err(e) = producer.await {
            error!(error = %e, "Producer task failed");
        }

        info!(
            players_processed = report.players_processed,
            players_skipped = report.players_skipped,
            fetch_failures = report.fetch_failures,
            files_written = report.files_written,
            render_failures = report.render_failures,
            "Dispatch complete"
        );
        report
    }
}

async fn work(
    worker: usize,
    shared: Arc<Shared>,
    rx: Arc<Mutex<mpsc::Receiver<i64>>>,
) -> DispatchReport {
    let mut report = DispatchReport::default();

    loop {
        let next = rx.lock().await.recv().await;
        let Some(player_id) = next else {
            break;
        };

        let player = match shared.source.get_player_data(player_id).await {
            Ok(player) => player,
            Err(e) => {
                warn!(player_id, error = %e, "Stat fetch failed");
                report.fetch_failures += 1;
                continue;
            }
        };
        if player.is_empty() {
            info!(player_id, "No stats for player, skipping");
            report.players_skipped += 1;
            continue;
        }

        debug!(worker, player_id, nick = %player.stripped_nick, "Rendering player");
        report.players_processed += 1;

        let player = Arc::new(player);
        for skin in &shared.skins {
            match render_one(&shared, &player, skin).await {
                Ok(bytes) => match shared.output.write(&skin.name, player_id, bytes).await {
                    Ok(path) => {
                        debug!(player_id, skin = %skin.name, path = %path.display(), "Wrote badge");
                        report.files_written += 1;
                    }
                    Err(e) => {
                        error!(player_id, skin = %skin.name, error = %e, "Write failed");
                        report.render_failures += 1;
                    }
                },
                Err(e) => {
                    error!(player_id, skin = %skin.name, error = %e, "Render failed");
                    report.render_failures += 1;
                }
            }
        }
    }

    debug!(worker, "Worker finished");
    report
}

async fn render_one(
    shared: &Shared,
    player: &Arc<PlayerStatSummary>,
    skin: &Arc<SkinDefinition>,
) -> BadgeResult<Vec<u8>> {
    let backend = Arc::clone(&shared.backend);
    let player = Arc::clone(player);
    let skin = Arc::clone(skin);

    tokio::task::spawn_blocking(move || render(backend.as_ref(), &player, &skin))
        .await
        .map_err(|e| BadgeError::RenderError(e.to_string()))?
}
