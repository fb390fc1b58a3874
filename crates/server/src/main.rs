use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use eyre::WrapErr;
use otbp_core::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::EnvFilter;

mod error;
mod routes;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DayBoundaryArg {
    Utc,
    Local,
}

impl From<DayBoundaryArg> for DayBoundary {
    fn from(arg: DayBoundaryArg) -> Self {
        match arg {
            DayBoundaryArg::Utc => DayBoundary::Utc,
            DayBoundaryArg::Local => DayBoundary::Local,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "otbp-server",
    version,
    about = "HTTP server for the location-based photo target game",
    long_about = "Hands out targets near a player's position, reusing one of today's \
                  targets when it is close enough, and records posts against them.\n\n\
                  Game settings come from an optional JSON config file; any flag given \
                  here overrides the file."
)]
struct Args {
    /// Address to listen on
    #[arg(long, env = "OTBP_LISTEN", default_value = "127.0.0.1:8080")]
    listen: SocketAddr,

    /// JSON file with game settings
    #[arg(short, long, env = "OTBP_CONFIG")]
    config: Option<PathBuf>,

    /// Reuse an existing target when it is closer than this (meters)
    #[arg(long, env = "OTBP_ACCEPTANCE_THRESHOLD_METERS")]
    acceptance_threshold_meters: Option<f64>,

    /// Minimum distance of a generated target from the player (meters)
    #[arg(long, env = "OTBP_MIN_GENERATION_DISTANCE_METERS")]
    min_generation_distance_meters: Option<f64>,

    /// Maximum distance of a generated target from the player (meters)
    #[arg(long, env = "OTBP_MAX_GENERATION_DISTANCE_METERS")]
    max_generation_distance_meters: Option<f64>,

    /// Posts per page
    #[arg(long, env = "OTBP_PAGE_SIZE")]
    page_size: Option<usize>,

    /// Calendar day used to decide which targets are "today's"
    #[arg(long, env = "OTBP_DAY_BOUNDARY", value_enum)]
    day_boundary: Option<DayBoundaryArg>,

    /// Base URL under which uploaded pictures are served
    #[arg(long, env = "OTBP_IMAGE_BASE_URL")]
    image_base_url: Option<String>,

    /// Seed the target generator (for reproducible runs)
    #[arg(long, env = "OTBP_SEED")]
    seed: Option<u64>,

    /// Verbose output (show debug messages)
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn game_config(&self) -> eyre::Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .wrap_err_with(|| format!("Failed to read config {}", path.display()))?;
                serde_json::from_str::<GameConfig>(&raw)
                    .wrap_err_with(|| format!("Failed to parse config {}", path.display()))?
            }
            None => GameConfig::default(),
        };

        if let Some(meters) = self.acceptance_threshold_meters {
            config.acceptance_threshold_meters = meters;
        }
        if let Some(meters) = self.min_generation_distance_meters {
            config.min_generation_distance_meters = meters;
        }
        if let Some(meters) = self.max_generation_distance_meters {
            config.max_generation_distance_meters = meters;
        }
        if let Some(page_size) = self.page_size {
            config.default_page_size = page_size;
        }
        if let Some(day_boundary) = self.day_boundary {
            config.day_boundary = day_boundary.into();
        }

        config.validate().wrap_err("Invalid game configuration")?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let config = args.game_config()?;
    tracing::info!(?config, "loaded game configuration");

    let mut store = MemoryStore::new().with_day_boundary(config.day_boundary);
    if let Some(base) = &args.image_base_url {
        store = store.with_image_base_url(base);
    }

    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let service = GameService::with_store(config, rng, Arc::new(store))
        .wrap_err("Failed to build game service")?;
    let app = routes::create_router(Arc::new(service));

    let listener = tokio::net::TcpListener::bind(args.listen)
        .await
        .wrap_err_with(|| format!("Failed to bind {}", args.listen))?;
    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await
        .wrap_err("Server error")?;

    Ok(())
}
