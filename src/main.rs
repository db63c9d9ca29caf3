//! # Post Office Simulation
//!
//! Runs one simulation and writes its event log.
//!
//! ```bash
//! # 3 customers, 2 workers, arrivals within 100 ms, breaks up to 100 ms,
//! # closing after 500-1000 ms
//! post-office 3 2 100 100 1000
//!
//! # Reproducible run, checked afterwards
//! post-office 3 2 100 100 1000 --seed 42 --audit --output run.log
//! ```
//!
//! Exit status is 0 on full success and 1 on any error. The diagnostic on
//! stderr names the kind of failure (configuration, shared resource, spawn or
//! actor).

use clap::error::ErrorKind;
use clap::Parser;
use post_office::audit::LogAudit;
use post_office::config::OfficeConfig;
use post_office::framework::{Environment, SeededEnv, SystemEnv, TokioSpawner};
use post_office::lifecycle::{create_output, setup_tracing, OfficeSystem, RunReport, SystemError, DEFAULT_OUTPUT};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

/// Post office customer and worker simulation
#[derive(Parser, Debug)]
#[command(name = "post-office")]
#[command(about = "Simulates customers and workers sharing a post office")]
#[command(version)]
struct Args {
    /// Number of customers (NZ)
    customers: u32,

    /// Number of workers (NU), at least 1
    workers: u32,

    /// Longest customer arrival delay in ms (TZ, at most 10000)
    max_arrival_delay_ms: u64,

    /// Longest worker break in ms (TU, at most 100)
    max_break_ms: u64,

    /// Longest time before the office closes in ms (F, at most 10000)
    max_close_after_ms: u64,

    /// Event log file, truncated on start
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Check the event log once the run finished
    #[arg(long)]
    audit: bool,

    /// Diagnostic log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "off")]
    log_level: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            if err.print().is_err() {
                eprintln!("{err}");
            }
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };
    setup_tracing(&args.log_level);

    let config = match OfficeConfig::new(
        args.customers,
        args.workers,
        args.max_arrival_delay_ms,
        args.max_break_ms,
        args.max_close_after_ms,
    ) {
        Ok(config) => config,
        Err(err) => return fail(SystemError::from(err)),
    };

    let output = match create_output(&args.output) {
        Ok(file) => file,
        Err(err) => return fail(SystemError::from(err)),
    };

    let result = match args.seed {
        Some(seed) => {
            info!(seed, "seeded run");
            simulate(config, SeededEnv::new(seed), output).await
        }
        None => simulate(config, SystemEnv::new(), output).await,
    };
    let report = match result {
        Ok(report) => report,
        Err(err) => return fail(err),
    };

    if let Some(err) = &report.spawn_error {
        eprintln!("ERROR: spawn failure: {err}");
    }
    for (actor, err) in &report.actor_errors {
        eprintln!("ERROR: actor {actor} failed: {err}");
    }
    if let Some(err) = &report.closing_error {
        eprintln!("ERROR: failed to close the office: {err}");
    }
    if let Some(err) = &report.release_error {
        eprintln!("ERROR: shared resource failure: {err}");
    }

    if args.audit && !audit(&args.output) {
        return ExitCode::FAILURE;
    }

    ExitCode::from(report.exit_code())
}

async fn simulate<E: Environment>(config: OfficeConfig, env: E, output: File) -> Result<RunReport, SystemError> {
    OfficeSystem::new(config, env, TokioSpawner).run(output).await
}

fn audit(path: &Path) -> bool {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("ERROR: cannot read {} for audit: {err}", path.display());
            return false;
        }
    };
    match LogAudit::from_text(&text) {
        Ok(summary) => {
            info!(?summary, "audit passed");
            true
        }
        Err(err) => {
            eprintln!("ERROR: audit failed: {err}");
            false
        }
    }
}

fn fail(err: SystemError) -> ExitCode {
    eprintln!("ERROR: {err}");
    ExitCode::FAILURE
}
