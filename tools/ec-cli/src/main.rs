//! EC-CLI: Exposure-Companion command-line driver
//!
//! Loads an observation log and a diagnosis key file, runs one matching run
//! on the background worker and prints the encounters found.
//!
//! ```text
//! ec-cli match --observations log.json --keys keys.json [--gap-secs 10] [--json]
//! ec-cli days  --observations log.json [--keys keys.json]
//! ```
//!
//! Logging is configured through `EC_LOG_LEVEL`/`RUST_LOG` and `EC_JSON_LOGS`;
//! matching defaults through `EC_GAP_THRESHOLD_SECS`, `EC_TZ_OFFSET_SECS`,
//! `EC_KEEP_EMPTY_RECORDS` and `EC_HISTORY_DAYS`.

mod providers;
mod render;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ec_01_exposure_matching::{ExposureMatchingService, MatchEvent, MatchingApi, MatchingConfig};
use ec_telemetry::{init_telemetry, TelemetryConfig};
use shared_types::TimeZoneOffset;
use tracing::{info, warn};

use crate::providers::{JsonKeyFile, JsonObservationFile};

/// EC-CLI: match published diagnosis keys against a recorded observation log
#[derive(Parser, Debug)]
#[command(name = "ec-cli")]
#[command(about = "Match Exposure Notification diagnosis keys against an observation log")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one matching pass and print the encounters found
    Match {
        /// Observation log (JSON)
        #[arg(long)]
        observations: PathBuf,

        /// Diagnosis keys (JSON)
        #[arg(long)]
        keys: PathBuf,

        /// Gap that separates two encounters, in seconds
        #[arg(long)]
        gap_secs: Option<i64>,

        /// Local time zone offset east of UTC, in seconds
        #[arg(long, allow_hyphen_values = true)]
        tz_offset_secs: Option<i32>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print per-day observation counts for the history window
    Days {
        /// Observation log (JSON)
        #[arg(long)]
        observations: PathBuf,

        /// Also bin these diagnosis keys over the same days
        #[arg(long)]
        keys: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let telemetry = TelemetryConfig::for_subsystem("01", "exposure-matching");
    init_telemetry(&telemetry).context("failed to initialize logging")?;

    match args.command {
        Command::Match {
            observations,
            keys,
            gap_secs,
            tz_offset_secs,
            json,
        } => {
            let mut config = MatchingConfig::from_env().context("invalid matching configuration")?;
            if let Some(secs) = gap_secs {
                config = config.with_gap_threshold_secs(secs);
            }
            if let Some(secs) = tz_offset_secs {
                config = config.with_time_zone_offset(TimeZoneOffset(secs));
            }
            run_match(observations, keys, config, json).await
        }
        Command::Days { observations, keys } => {
            let config = MatchingConfig::from_env().context("invalid matching configuration")?;
            run_days(observations, keys, config).await
        }
    }
}

async fn run_match(
    observations: PathBuf,
    keys: PathBuf,
    config: MatchingConfig,
    json: bool,
) -> Result<()> {
    let service = ExposureMatchingService::with_config(
        Arc::new(JsonObservationFile::new(observations)),
        Arc::new(JsonKeyFile::new(keys)),
        config,
    )?;

    let mut run = service.start_run().await.context("could not start matching run")?;
    info!(run_id = %run.id(), "Matching run started");

    // Ctrl-C asks the run to stop after the current key.
    let token = run.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling matching run");
            token.cancel();
        }
    });

    while let Some(event) = run.next_event().await {
        match event {
            MatchEvent::Progress { processed, total } => {
                if !json && (processed == total || processed % 100 == 0) {
                    eprintln!("processed {processed}/{total} keys");
                }
            }
            MatchEvent::Completed { partial } => {
                info!(partial, "Matching run completed");
                break;
            }
            MatchEvent::Failed { reason } => {
                warn!(%reason, "Matching run failed");
                break;
            }
        }
    }

    let report = run.join().await?;
    if json {
        let view = render::ReportView::from(&report);
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        render::print_report(&report);
    }
    Ok(())
}

async fn run_days(
    observations: PathBuf,
    keys: Option<PathBuf>,
    config: MatchingConfig,
) -> Result<()> {
    let key_file = JsonKeyFile::new(keys.clone().unwrap_or_default());
    let service = ExposureMatchingService::with_config(
        Arc::new(JsonObservationFile::new(observations)),
        Arc::new(key_file),
        config,
    )?;

    let index = service.load_index().await?;
    let days = service.observation_overview(&index);
    render::print_day_counts(&days);

    if keys.is_some() {
        if let (Some((first, _)), Some((last, _))) = (days.first(), days.last()) {
            let published = service.load_keys().await?;
            println!();
            render::print_histogram(&service.key_histogram(&published, *first, *last));
        }
    }
    Ok(())
}
