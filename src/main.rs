//! brokerage_report - Intraday equity brokerage report
//!
//! Quotes every trade leg of an input sheet against a fee calculator and
//! writes the charges summary workbook.
//!
//! # Usage
//! ```sh
//! brokerage_report NIFTY_parameter_Input.xlsx --workers 5
//! QUOTE_MODE=http QUOTE_SERVICE_URL=http://localhost:8080/calc brokerage_report trades.csv
//! ```

use anyhow::{Context, Result};
use brokerage_report::application::pipeline::{
    ChannelProgressSink, QuoteClient, ReportPipeline, RunLayout, RunReport,
};
use brokerage_report::config::{Config, QuoteMode};
use brokerage_report::domain::ports::ProgressEvent;
use brokerage_report::infrastructure::ServiceFactory;
use brokerage_report::infrastructure::observability::{Metrics, RunReporter};
use brokerage_report::infrastructure::quote::SessionTracker;
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use tracing::{Level, error, info};
use tracing_subscriber::prelude::*;
use url::Url;

#[derive(Parser)]
#[command(name = "brokerage_report")]
#[command(about = "Compute intraday equity charges for every trade leg of a sheet", long_about = None)]
struct Cli {
    /// Input sheet (.csv, .xlsx, .xls, .xlsm, .ods)
    input: PathBuf,

    /// Concurrent quote sessions (overrides PIPELINE_WORKERS)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Fee calculator: schedule, http or mock (overrides QUOTE_MODE)
    #[arg(long)]
    quote_mode: Option<String>,

    /// Fee calculator endpoint (overrides QUOTE_SERVICE_URL)
    #[arg(long)]
    quote_url: Option<String>,

    /// Fee schedule TOML (overrides FEE_SCHEDULE_PATH)
    #[arg(long)]
    fee_schedule: Option<PathBuf>,

    /// Root for the parameter extract, INPUT and OUTPUT (overrides REPORT_BASE_DIR)
    #[arg(long)]
    base_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false).pretty();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(report) => {
            println!(
                "Report for {}: {} rows written, {} failed -> {}",
                report.symbol,
                report.succeeded(),
                report.failed(),
                report.summary_path.display()
            );
        }
        Err(e) => {
            error!("Run failed: {:#}", e);
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<RunReport> {
    let config = load_config(&cli)?;
    info!(
        "brokerage_report {} | quote mode {:?} | {} workers",
        env!("CARGO_PKG_VERSION"),
        config.quote_mode,
        config.workers
    );

    let sessions = SessionTracker::new();
    let service = ServiceFactory::create_quote_service(&config, sessions.clone())?;
    let service_name = service.name();
    let metrics = Metrics::new()?;
    let client = QuoteClient::new(service).with_metrics(metrics.clone());
    let pipeline = ReportPipeline::new(client, config.workers, RunLayout::from_config(&config));
    let reporter = RunReporter::new(metrics, sessions, service_name);

    let (progress_tx, progress_rx) = crossbeam_channel::unbounded::<ProgressEvent>();
    let renderer = std::thread::spawn(move || render_progress(progress_rx));

    let sink = ChannelProgressSink::new(progress_tx);
    let result = pipeline.run(&cli.input, &sink).await;
    drop(sink);
    if renderer.join().is_err() {
        error!("Progress renderer panicked");
    }

    let report = result?;
    if config.observability_enabled {
        reporter.report(&report.symbol, report.succeeded(), report.failed());
    }
    Ok(report)
}

/// Env first, then CLI flags on top.
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::from_env()?;

    if let Some(workers) = cli.workers {
        config.workers = workers;
    }
    if let Some(mode) = &cli.quote_mode {
        config.quote_mode = mode.parse::<QuoteMode>()?;
    }
    if let Some(url) = &cli.quote_url {
        config.quote_service_url =
            Some(Url::parse(url).with_context(|| format!("Invalid --quote-url {}", url))?);
    }
    if let Some(path) = &cli.fee_schedule {
        config.fee_schedule_path = Some(path.clone());
    }
    if let Some(base_dir) = &cli.base_dir {
        config.base_dir = base_dir.clone();
    }

    config.validate()?;
    Ok(config)
}

/// Draws a single progress line on stderr until the sender goes away.
fn render_progress(events: crossbeam_channel::Receiver<ProgressEvent>) {
    let mut stderr = std::io::stderr();
    for event in events {
        match event {
            ProgressEvent::Advanced {
                completed,
                total,
                percent,
            } => {
                let _ = write!(stderr, "\rProcessing: {:>5.1}% ({}/{})", percent, completed, total);
                let _ = stderr.flush();
            }
            ProgressEvent::Finished {
                total,
                succeeded,
                failed,
            } => {
                let _ = writeln!(
                    stderr,
                    "\rProcessed {} rows: {} succeeded, {} failed",
                    total, succeeded, failed
                );
            }
        }
    }
}
