//! logbook - maintain the local flight logbook replica.
//!
//! Imports flights from JSON files, exports snapshots, removes duplicate
//! flights and reports the replica's sync state. Synchronization with the
//! server is driven by applications embedding `logbook_sync`.

use clap::{Parser, Subcommand};
use logbook_engine::parse_flights;
use logbook_sync::config::{parse_tolerance, Config};
use logbook_sync::{logbook, SqliteStore};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "logbook")]
#[command(about = "Maintain the local flight logbook")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Database URL, overrides DATABASE_URL
    #[arg(long, global = true, value_name = "URL")]
    database_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge flights from a snapshot or a JSON array of flights
    Import {
        file: PathBuf,
        /// Seconds two flights' times may differ and still match
        #[arg(long, value_name = "SECS", value_parser = parse_tolerance)]
        tolerance: Option<i64>,
    },
    /// Write every stored flight to a snapshot file
    Export { file: PathBuf },
    /// Delete flights that repeat an earlier flight
    Dedupe,
    /// Show record counts and the logbook checksum
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "logbook_sync=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    let cli = Cli::parse();

    let database_url = config.database_url_or(cli.database_url.as_deref());
    tracing::debug!(%database_url, "Opening logbook");
    let store = SqliteStore::open(database_url).await?;

    let now = chrono::Utc::now().timestamp();

    match cli.command {
        Commands::Import { file, tolerance } => {
            let json = tokio::fs::read_to_string(&file).await?;
            let flights = parse_flights(&json)?;
            let tolerance = tolerance.unwrap_or(config.import_time_tolerance);

            let report = logbook::import_records(&store, &flights, tolerance, now).await?;
            println!(
                "Imported {}: {} added, {} updated, {} unchanged",
                file.display(),
                report.added,
                report.updated,
                report.unchanged
            );
        }
        Commands::Export { file } => {
            let snapshot = logbook::export_snapshot(&store, now).await?;
            tokio::fs::write(&file, snapshot.to_json_pretty()?).await?;
            println!(
                "Exported {} flights to {}",
                snapshot.record_count(),
                file.display()
            );
        }
        Commands::Dedupe => {
            let removed = logbook::remove_duplicate_records(&store).await?;
            for flight in &removed {
                println!(
                    "Removed #{} {} -> {} ({})",
                    flight.id, flight.orig, flight.dest, flight.time_out
                );
            }
            println!("Removed {} duplicate flights", removed.len());
        }
        Commands::Status { json } => {
            let status = logbook::logbook_status(&store).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&status)?);
                return Ok(());
            }
            println!("Flights:        {}", status.records);
            println!("Planned:        {}", status.planned);
            println!("Unacknowledged: {}", status.unacknowledged);
            println!("Checksum:       {}", status.checksum);
            if config.credentials().is_none() {
                println!("Sync:           no credentials configured");
            }
        }
    }

    Ok(())
}
