use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use rust_decimal::Decimal;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use flightpay_core::calculations::estimator::{EstimatorConfig, FlightEstimator, UniformPicker};
use flightpay_core::db::{DbConfig, FlightRepository, RepositoryRegistry};
use flightpay_db_sqlite::SqliteRepositoryFactory;
use flightpay_geocode::{GeocodeClient, GeocodeConfig};

mod report;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Pilot pay estimator comparing per-state and home-state taxation.
///
/// Fetches pending flights from the configured database, samples
/// waypoints along each route, resolves the state under each waypoint,
/// and prints a per-flight pay breakdown under both tax policies.
#[derive(Debug, Parser)]
struct Cli {
    /// Database backend to use.
    #[arg(long, default_value = "sqlite")]
    backend: String,

    /// Database connection string.
    /// For SQLite this is a file URL (e.g. `sqlite:flightpay.db`) or `sqlite::memory:`.
    #[arg(long, default_value = "sqlite:flightpay.db?mode=rwc")]
    db: String,

    /// Maximum number of flights to estimate in one run.
    #[arg(long, default_value_t = 100)]
    limit: u32,

    /// Number of waypoints sampled along each route, endpoints included.
    #[arg(long, default_value_t = 30)]
    waypoints: usize,

    /// Hourly pay rate in dollars.
    #[arg(long, default_value = "58.73")]
    hourly_rate: Decimal,

    /// Annual income used to pick each state's marginal bracket.
    #[arg(long, default_value = "100000")]
    annual_income: Decimal,

    /// Base URL of the reverse-geocoding service.
    #[arg(long)]
    geocode_url: Option<String>,

    /// Geocoding API key. Falls back to the GEOCODE_API_KEY environment variable.
    #[arg(long)]
    api_key: Option<String>,

    /// Per-request geocoding timeout in seconds.
    #[arg(long, default_value_t = 5)]
    timeout_secs: u64,

    /// Seed for the home-state draw, for reproducible runs.
    #[arg(long)]
    seed: Option<u64>,
}

// ─── tracing ─────────────────────────────────────────────────────────────────

/// Initialise the tracing subscriber.
///
/// * Honours `RUST_LOG` when set.
/// * Falls back to `info` so normal runs are quiet.
/// * Strips timestamps and target names to keep CLI output clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .with_target(false)
        .init();
}

// ─── wiring ──────────────────────────────────────────────────────────────────

fn build_registry() -> RepositoryRegistry {
    let mut registry = RepositoryRegistry::new();
    registry.register(Box::new(SqliteRepositoryFactory));
    registry
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let db_config = DbConfig {
        backend: cli.backend,
        connection_string: cli.db,
    };

    debug!("connecting to {} backend", db_config.backend);
    let registry = build_registry();
    let repository: Arc<dyn FlightRepository> = Arc::from(registry.create(&db_config).await?);

    let mut geocode_config = GeocodeConfig {
        api_key: cli.api_key.or_else(|| std::env::var("GEOCODE_API_KEY").ok()),
        timeout: Duration::from_secs(cli.timeout_secs),
        ..GeocodeConfig::default()
    };
    if let Some(url) = cli.geocode_url {
        geocode_config.base_url = url;
    }
    let resolver = Box::new(GeocodeClient::new(geocode_config)?);

    let config = EstimatorConfig {
        hourly_rate: cli.hourly_rate,
        annual_income: cli.annual_income,
        waypoint_count: cli.waypoints,
        batch_limit: cli.limit,
    };

    let mut estimator = FlightEstimator::new(repository, resolver, config)?;
    if let Some(seed) = cli.seed {
        estimator = estimator.with_picker(Box::new(UniformPicker::seeded(seed)));
    }

    let outcome = estimator.run().await?;
    print!("{}", report::render(&outcome));

    Ok(())
}
