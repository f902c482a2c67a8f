use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use flightpay_data::{AirportLoader, FlightScheduleLoader, TaxBracketLoader};
use flightpay_db_sqlite::SqliteRepository;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DataKind {
    /// State tax brackets (jurisdiction, lower_bound, upper_bound, rate_percent)
    Brackets,
    /// Airport locations (code, lat, lon)
    Airports,
    /// Flight schedules (flight_id, departure_code, arrival_code, departure_time, arrival_time)
    Flights,
}

/// Load flight pay reference data from a CSV file into the database.
///
/// Loads are idempotent: existing rows for the keys present in the file
/// are replaced, and everything else is left alone.
#[derive(Parser, Debug)]
#[command(name = "flightpay-loader")]
#[command(version, about, long_about = None)]
struct Args {
    /// Kind of records the CSV file contains
    #[arg(value_enum)]
    kind: DataKind,

    /// Path to the CSV file
    #[arg(short, long)]
    file: PathBuf,

    /// SQLite database URL (e.g., sqlite:flightpay.db?mode=rwc to create if missing)
    #[arg(short, long, default_value = "sqlite:flightpay.db?mode=rwc")]
    database: String,

    /// Run database migrations before loading data
    #[arg(short, long, default_value_t = false)]
    migrate: bool,

    /// Run seed files from the specified directory after migrations
    #[arg(short, long)]
    seeds: Option<PathBuf>,
}

/// Honours `RUST_LOG`, defaulting to `info` so seed and migration events
/// from the repository show up alongside the progress lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let repo = SqliteRepository::new(&args.database)
        .await
        .with_context(|| format!("Failed to connect to database: {}", args.database))?;

    if args.migrate {
        println!("Running migrations...");
        repo.run_migrations()
            .await
            .context("Failed to run migrations")?;
        println!("Migrations complete.");
    }

    if let Some(seeds_dir) = &args.seeds {
        println!("Running seeds from: {}", seeds_dir.display());
        repo.run_seeds(seeds_dir)
            .await
            .with_context(|| format!("Failed to run seeds from: {}", seeds_dir.display()))?;
        println!("Seeds complete.");
    }

    println!("Loading records from: {}", args.file.display());

    let file = File::open(&args.file)
        .with_context(|| format!("Failed to open: {}", args.file.display()))?;

    let inserted = match args.kind {
        DataKind::Brackets => {
            let records = TaxBracketLoader::parse(file)
                .with_context(|| format!("Failed to parse CSV: {}", args.file.display()))?;
            println!("Parsed {} records from CSV", records.len());
            TaxBracketLoader::load(&repo, &records)
                .await
                .context("Failed to load tax brackets into database")?
        }
        DataKind::Airports => {
            let records = AirportLoader::parse(file)
                .with_context(|| format!("Failed to parse CSV: {}", args.file.display()))?;
            println!("Parsed {} records from CSV", records.len());
            AirportLoader::load(&repo, &records)
                .await
                .context("Failed to load airports into database")?
        }
        DataKind::Flights => {
            let records = FlightScheduleLoader::parse(file)
                .with_context(|| format!("Failed to parse CSV: {}", args.file.display()))?;
            println!("Parsed {} records from CSV", records.len());
            FlightScheduleLoader::load(&repo, &records)
                .await
                .context("Failed to load flights into database")?
        }
    };

    println!("Successfully loaded {} records into the database.", inserted);

    Ok(())
}
