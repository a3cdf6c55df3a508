#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the vessel activity ingestion tool.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use seatrace_ingest::progress::{IndicatifProgress, init_logger};
use seatrace_ingest::{load_vessels, run_job, summarize};
use seatrace_ingest_models::IngestOptions;
use seatrace_store::VesselStore;
use seatrace_store::memory::MemoryStore;
use seatrace_store::mongo::MongoStore;
use seatrace_tracking::TrackingApi;
use seatrace_tracking::client::ApiClient;
use seatrace_tracking_models::DateRange;

#[derive(Parser)]
#[command(name = "seatrace", about = "Vessel activity ingestion tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest vessel activity from the tracking API into the store
    Run {
        /// Path to the vessel CSV (`vessel_id`/`id` plus optional `name` columns)
        #[arg(long)]
        vessels: PathBuf,
        /// First day of the query window (YYYY-MM-DD)
        #[arg(long, default_value = "2023-01-01")]
        start_date: String,
        /// Last day of the query window (YYYY-MM-DD)
        #[arg(long, default_value = "2025-12-31")]
        end_date: String,
        /// Comma-separated dataset ids, or `auto` for the default event sets
        #[arg(long, default_value = "auto")]
        datasets: String,
        /// Events per page when walking the paginated endpoint
        #[arg(long, default_value_t = 200)]
        page_limit: u64,
        /// Maximum vessels in flight at once
        #[arg(long, default_value_t = 8)]
        max_workers: usize,
        /// Cap on vessels to process (0 = no cap)
        #[arg(long, default_value_t = 0)]
        max_vessels: usize,
        /// Do not embed the event list inline on the vessel document
        #[arg(long)]
        no_embed_events: bool,
        /// Also maintain the separate indexed event collection
        #[arg(long)]
        write_events_collection: bool,
        /// Fetch normally but write to an in-memory store (nothing persists)
        #[arg(long)]
        dry_run: bool,
    },
    /// Parse and list the vessel CSV
    Vessels {
        /// Path to the vessel CSV
        path: PathBuf,
    },
    /// Create the store indexes
    EnsureIndexes {
        /// Also create the event collection indexes
        #[arg(long)]
        write_events_collection: bool,
    },
}

/// Validates the date window and keeps the original ISO strings for the
/// wire.
fn parse_range(start_date: &str, end_date: &str) -> Result<DateRange, Box<dyn std::error::Error>> {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d")?;
    let end = NaiveDate::parse_from_str(end_date, "%Y-%m-%d")?;

    if start > end {
        return Err(format!("start date {start_date} is after end date {end_date}").into());
    }

    Ok(DateRange {
        start_date: start_date.to_owned(),
        end_date: end_date.to_owned(),
    })
}

/// Connects to MongoDB using `MONGODB_URI`/`MONGODB_DB`, defaulting to a
/// local instance.
async fn connect_store_from_env(
    with_events_collection: bool,
) -> Result<MongoStore, Box<dyn std::error::Error>> {
    let uri = std::env::var("MONGODB_URI")
        .unwrap_or_else(|_| "mongodb://localhost:27017".to_owned());
    let db_name = std::env::var("MONGODB_DB").unwrap_or_else(|_| "seatrace".to_owned());

    Ok(MongoStore::connect(&uri, &db_name, with_events_collection).await?)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = init_logger();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            vessels,
            start_date,
            end_date,
            datasets,
            page_limit,
            max_workers,
            max_vessels,
            no_embed_events,
            write_events_collection,
            dry_run,
        } => {
            let range = parse_range(&start_date, &end_date)?;
            let datasets: Vec<String> = datasets
                .split(',')
                .map(str::trim)
                .filter(|ds| !ds.is_empty())
                .map(str::to_owned)
                .collect();

            let mut vessel_list = load_vessels(&vessels)?;
            if max_vessels > 0 {
                vessel_list.truncate(max_vessels);
            }
            if vessel_list.is_empty() {
                log::warn!("No vessels found in {}", vessels.display());
            }

            let token = std::env::var("SEATRACE_API_TOKEN")
                .map_err(|_| "SEATRACE_API_TOKEN is not set")?;
            let api: Arc<dyn TrackingApi> = Arc::new(ApiClient::new(&token)?);

            let store: Arc<dyn VesselStore> = if dry_run {
                log::info!("Dry run: writing to an in-memory store");
                Arc::new(MemoryStore::new())
            } else {
                let store = connect_store_from_env(write_events_collection).await?;
                store.ensure_indexes().await?;
                Arc::new(store)
            };

            let options = IngestOptions {
                range,
                datasets,
                page_size: page_limit,
                workers: max_workers,
                embed_events: !no_embed_events,
                write_events: write_events_collection,
            };

            let total = vessel_list.len() as u64;
            log::info!(
                "Ingesting {total} vessel(s), {} worker(s), window {}..{}",
                options.workers,
                options.range.start_date,
                options.range.end_date
            );

            let bar = IndicatifProgress::vessels_bar(&multi, "Fetching vessel activity");
            let outcomes = run_job(&api, &store, &vessel_list, &options, &bar).await;
            let report = summarize(total, outcomes);

            bar.finish(format!(
                "Processed {}/{} vessel(s), {} failed",
                report.processed,
                report.total_vessels,
                report.failed.len()
            ));

            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Vessels { path } => {
            let vessel_list = load_vessels(&path)?;
            println!("{:<44} NAME", "VESSEL_ID");
            println!("{}", "-".repeat(60));
            for vessel in &vessel_list {
                println!(
                    "{:<44} {}",
                    vessel.vessel_id,
                    vessel.name.as_deref().unwrap_or("-")
                );
            }
        }
        Commands::EnsureIndexes {
            write_events_collection,
        } => {
            log::info!("Creating store indexes...");
            let store = connect_store_from_env(write_events_collection).await?;
            store.ensure_indexes().await?;
            log::info!("Indexes ready.");
        }
    }

    Ok(())
}
