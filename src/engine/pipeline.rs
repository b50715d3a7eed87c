use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use tracing::info;

use crate::config::Settings;
use crate::features::build_features;
use crate::loader::{load_sources, spawn_transactions_load};
use crate::normalizer::convert_to_usd;
use crate::report::ReportGenerator;

/// Orchestrates load → validate → convert → features → report.
pub struct Pipeline {
    settings: Settings
}

impl Pipeline {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Runs every stage and returns the report folder.
    pub async fn run_all(&self) -> Result<PathBuf> {
        let timer = Instant::now();
        let (transactions, fx) = load_sources(&self.settings).await?;

        let enriched = convert_to_usd(&transactions, &fx, self.settings.strict)?;
        info!("Normalized {} row(s) into the reference currency", enriched.len());

        let features = build_features(&enriched)?;
        info!("Derived {} column(s) for {} row(s)", features.columns().len(), features.len());

        let out_dir = self.report_generator().run(&features)?;
        info!("Pipeline finished in {:?}", timer.elapsed());

        Ok(out_dir)
    }

    /// Feature-focused run; the stages are the same as [`Pipeline::run_all`].
    pub async fn run_features(&self) -> Result<PathBuf> {
        self.run_all().await
    }

    /// Reports on the validated transactions as loaded, without conversion or features.
    pub async fn run_eda(&self) -> Result<PathBuf> {
        let transactions = spawn_transactions_load(self.settings.paths.transactions_file.clone()).await??;

        Ok(self.report_generator().run(&transactions)?)
    }

    fn report_generator(&self) -> ReportGenerator {
        ReportGenerator::new(&self.settings.paths.reports_dir)
    }
}
