//! # EPG Harvest
//!
//! A schedule-harvesting pipeline that pulls TV program guides from
//! heterogeneous sources (JSON APIs, server-rendered HTML, hour-sliced grid
//! APIs) and emits one normalized listing file per channel.
//!
//! ## Features
//!
//! - One generic pipeline for every source: date-window URL generation,
//!   sequential fetch/process/aggregate, duplicate removal, fixed-format
//!   serialization
//! - Per-source plug-ins behind three narrow contracts (URL formatter,
//!   data fetcher, data processor)
//! - Fan-out sources that multiplex several logical channels behind one API
//!   write one file per sub-channel
//! - All timestamps normalized into a single target time zone regardless of
//!   each source's origin zone
//!
//! ## Usage
//!
//! ```sh
//! epg_harvest --channel all --start-date 2025-03-15 --days-range 15
//! ```
//!
//! ## Architecture
//!
//! One run per channel walks the pipeline:
//! 1. **Generate**: expand the date window through the source's URL formatter
//! 2. **Fetch/Process/Aggregate**: retrieve each URL sequentially, normalize
//!    its payload, bucket the records per output file
//! 3. **Dedup**: collapse duplicate time slots, first occurrence wins
//! 4. **Serialize**: sort, clean, and write each bucket's listing file

use chrono::Local;
use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod cli;
mod config;
mod core;
mod models;
mod scrapers;
mod utils;

use cli::Cli;
use crate::core::date_window;
use utils::ensure_writable_dir;

#[tokio::main]
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
    info!("epg_harvest starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args.channel, ?args.start_date, args.days_range, "Parsed CLI arguments");

    let start_date_str = args
        .start_date
        .unwrap_or_else(|| Local::now().date_naive().to_string());
    let start = match date_window::parse_start_date(&start_date_str) {
        Ok(date) => date,
        Err(e) => {
            error!(start_date = %start_date_str, error = %e, "Invalid start date");
            return Err(e.into());
        }
    };

    let channels = config::load_channels(args.config.as_deref())?;
    let replacements = config::default_replacements();

    let selected: Vec<String> = if args.channel == "all" {
        channels.keys().cloned().collect()
    } else {
        vec![args.channel.clone()]
    };
    info!(count = selected.len(), start_date = %start, days_range = args.days_range, "Selected channels");

    let mut completed = 0usize;
    let mut skipped = 0usize;

    for key in &selected {
        let Some(channel_config) = channels.get(key) else {
            error!(
                channel = %key,
                available = ?scrapers::available_channels(),
                "No configuration for channel; skipping"
            );
            skipped += 1;
            continue;
        };
        if let Err(e) = channel_config.validate() {
            error!(channel = %key, error = %e, "Invalid channel configuration; skipping");
            skipped += 1;
            continue;
        }
        if let Err(e) = ensure_writable_dir(&channel_config.output_path).await {
            error!(
                channel = %key,
                path = %channel_config.output_path,
                error = %e,
                "Output directory is not writable (fix perms or choose a different path); skipping"
            );
            skipped += 1;
            continue;
        }

        info!(channel = %key, "Harvesting channel");
        match scrapers::run_channel(
            key,
            channel_config.clone(),
            start,
            args.days_range,
            &replacements,
        )
        .await
        {
            Ok(()) => {
                info!(channel = %key, "Channel complete");
                completed += 1;
            }
            Err(e) => {
                error!(channel = %key, error = %e, "Channel run failed");
                skipped += 1;
            }
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        completed,
        skipped,
        "Execution complete"
    );

    Ok(())
}
