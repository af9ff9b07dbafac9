//! Badge generator.
//!
//! Renders stat badges for recently active players (or all of them, or a
//! single one) into `<output>/<skin>/<player-id>.png`.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use badge_generator::{
    activity_window, warm_up_skins, Dispatcher, GeneratorConfig, JsonDirectorySource, OutputFormat,
    OutputLayout, PlayerDataSource,
};
use renderer::{load_skins, BadgeBackend, LayoutBackend, RasterBackend};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Backend {
    /// PNG badges drawn with TrueType fonts
    Raster,
    /// JSON dumps of where each text would be drawn
    Layout,
}

#[derive(Parser, Debug)]
#[command(name = "badge-generator")]
#[command(about = "Generate player stat badges for every skin")]
struct Args {
    /// Render every known player, ignoring --delta
    #[arg(long)]
    all: bool,

    /// Only players active within this many hours (0 means all players)
    #[arg(long, default_value = "6")]
    delta: u32,

    /// Render a single player
    #[arg(long, conflicts_with = "all")]
    pid: Option<i64>,

    /// Maximum number of players
    #[arg(long)]
    limit: Option<usize>,

    /// Number of concurrent render workers
    #[arg(short, long, default_value = "4")]
    workers: usize,

    /// Configuration file (JSON or YAML)
    #[arg(short, long, env = "BADGE_CONFIG")]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "raster")]
    backend: Backend,

    /// Transcode badges to JPEG
    #[arg(long)]
    jpeg: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = GeneratorConfig::load(args.config.as_deref())?;
    if args.jpeg {
        config.output_format = OutputFormat::Jpeg;
    }

    info!(
        skins_dir = %config.skins_dir.display(),
        output_dir = %config.output_dir.display(),
        players_dir = %config.players_dir.display(),
        workers = args.workers,
        "Starting badge generator"
    );

    let backend: Arc<dyn BadgeBackend> = match args.backend {
        Backend::Raster => Arc::new(RasterBackend::new()),
        Backend::Layout => Arc::new(LayoutBackend::new()),
    };

    let skins = load_skins(&config.skins_dir)?;
    let skins = warm_up_skins(backend.as_ref(), skins, &config.skins_dir)?;

    let output = OutputLayout::new(&config.output_dir, backend.extension())
        .with_format(config.output_format, config.jpeg_quality);
    output.prepare(skins.iter().map(|s| s.name.as_str())).await?;

    let source: Arc<dyn PlayerDataSource> =
        Arc::new(JsonDirectorySource::new(&config.players_dir));

    let player_ids = match args.pid {
        Some(pid) => vec![pid],
        None => {
            let window = activity_window(args.all, args.delta);
            source.find_players(window, args.limit).await?
        }
    };
    info!(count = player_ids.len(), "Selected players");

    let dispatcher = Dispatcher::new(backend, source, skins, output, args.workers);
    let report = dispatcher.run(player_ids).await;

    info!(
        files_written = report.files_written,
        render_failures = report.render_failures,
        "Badge generation finished"
    );
    Ok(())
}
