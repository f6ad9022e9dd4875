//! # WHO Speech Tracker
//!
//! A small archiving pipeline that keeps a local JSON collection of
//! recently published WHO speeches and backfills each one with the full
//! transcript text scraped from its detail page.
//!
//! ## Usage
//!
//! ```sh
//! who_speech_tracker --data-dir ./data
//! ```
//!
//! ## Architecture
//!
//! Each run makes a single sequential pass through three stages:
//! 1. **Listing**: Fetch the 50 most recent speeches from the hub API and
//!    keep those published within the recency window (default 90 days)
//! 2. **Merging**: Append genuinely new speeches to the persisted archive,
//!    keyed on their detail-page path, newest first
//! 3. **Enrichment**: Fetch the detail page of every archived speech still
//!    missing its transcript and store the extracted text
//!
//! A listing failure aborts the run before anything is written; enrichment
//! failures are per-record and retried on the next run.

use chrono::Local;
use clap::Parser;
use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod api;
mod cli;
mod dates;
mod enrich;
mod models;
mod store;
mod utils;

use cli::Cli;
use enrich::HttpFetcher;
use utils::{default_data_dir, ensure_writable_dir};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("speech_tracker starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args.data_dir, args.window_days, args.skip_enrich, "Parsed CLI arguments");

    // Early check: ensure the data directory is writable
    let data_dir = args
        .data_dir
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(default_data_dir);
    if let Err(e) = ensure_writable_dir(&data_dir).await {
        error!(
            path = %data_dir.display(),
            error = %e,
            "Data directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }
    let store_path = store::store_path(&data_dir);

    let client = reqwest::Client::builder().build()?;

    // ---- Listing ----
    // A failure here aborts the run; the archive hasn't been touched yet.
    let today = Local::now().date_naive();
    let fetched =
        api::fetch_recent_speeches(&client, &args.api_url, today, args.window_days).await?;

    // ---- Merging ----
    let added = store::merge_into_store(&store_path, fetched).await?;
    info!(added, store = %store_path.display(), "Merge pass complete");

    // ---- Enrichment ----
    if args.skip_enrich {
        info!("Skipping transcript enrichment (--skip-enrich)");
    } else {
        let fetcher = HttpFetcher::new(
            client.clone(),
            Duration::from_secs(args.detail_timeout_secs),
        );
        let updated = enrich::enrich_store(&store_path, &fetcher, &args.detail_base_url).await?;
        info!(updated, "Enrichment pass complete");
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
