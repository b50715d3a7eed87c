mod config;
mod engine;
mod features;
mod loader;
mod models;
mod normalizer;
mod report;
#[cfg(test)]
mod test_support;
mod types;
mod validation;

use std::fs::{create_dir_all, OpenOptions};
use std::io::stderr;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use crate::config::{Overrides, Settings};
use crate::engine::Pipeline;

const LOG_FILE: &str = "pipeline.log";

#[derive(Parser)]
#[command(name = "fraud-feature-pipeline")]
#[command(about = "Currency normalization, feature derivation and EDA reports for transaction fraud data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// JSON settings file
    #[arg(long, global = true, env = "FRAUD_PIPELINE_CONFIG")]
    config: Option<PathBuf>,
    /// Project directory holding data/ and reports/
    #[arg(long, global = true, env = "FRAUD_PIPELINE_BASE_DIR")]
    base_dir: Option<PathBuf>,
    /// Transactions CSV
    #[arg(long, global = true, env = "FRAUD_PIPELINE_TRANSACTIONS")]
    transactions: Option<PathBuf>,
    /// Historical exchange-rate CSV
    #[arg(long, global = true, env = "FRAUD_PIPELINE_FX")]
    fx: Option<PathBuf>,
    /// Directory for report folders and the log file
    #[arg(long, global = true, env = "FRAUD_PIPELINE_REPORTS_DIR")]
    reports_dir: Option<PathBuf>,
    /// Abort when any amount cannot be converted
    #[arg(long, global = true)]
    strict: bool,
    /// error, warn, info, debug or trace
    #[arg(long, global = true, default_value = "info", env = "FRAUD_PIPELINE_LOG_LEVEL")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// load -> convert -> features -> EDA
    RunAll,
    /// EDA on the loaded transactions only, without conversion or features
    RunEda,
    /// load -> convert -> features -> EDA over the feature table
    RunFe,
}

impl Cli {
    fn settings(&self) -> Result<Settings> {
        let settings = match &self.config {
            Some(path) => Settings::load_from_path(path)?,
            None => Settings::default()
        };

        Ok(settings.with_overrides(Overrides {
            base_dir: self.base_dir.clone(),
            transactions_file: self.transactions.clone(),
            fx_file: self.fx.clone(),
            reports_dir: self.reports_dir.clone(),
            strict: self.strict
        }))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = cli.settings()?;

    setup_logging(parse_log_level(&cli.log_level), &settings.paths.reports_dir)?;

    let pipeline = Pipeline::new(settings);

    let out_dir = match cli.command {
        Commands::RunAll => pipeline.run_all().await?,
        Commands::RunEda => pipeline.run_eda().await?,
        Commands::RunFe => pipeline.run_features().await?
    };

    info!("Done. Reports: {}", out_dir.display());
    println!("{}", out_dir.display());

    Ok(())
}

fn parse_log_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => {
            eprintln!("Invalid log level '{}', defaulting to 'info'", level);
            LevelFilter::INFO
        }
    }
}

fn setup_logging(level: LevelFilter, reports_dir: &Path) -> Result<()> {
    //NOTE: stdout only carries the report folder path, logging goes to stderr and the log file
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(level);

    create_dir_all(reports_dir)
        .with_context(|| format!("Failed to create reports directory {}", reports_dir.display()))?;

    let log_path = reports_dir.join(LOG_FILE);
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    let file_log = fmt::layer()
        .with_ansi(false)
        .with_writer(Mutex::new(log_file))
        .with_filter(level);

    tracing_subscriber::registry()
        .with(terminal_log)
        .with(file_log)
        .init();

    Ok(())
}
