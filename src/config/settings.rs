//! Runtime settings for the pipeline.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::types::CurrencyCode;

const DATA_DIR: &str = "data";
const REPORTS_DIR: &str = "reports";
const TRANSACTIONS_FILE: &str = "transaction_fraud_data.csv";
const FX_FILE: &str = "historical_currency_exchange.csv";
const KNOWN_CURRENCIES: [&str; 11] = ["AUD", "BRL", "CAD", "EUR", "GBP", "JPY", "MXN", "NGN", "RUB", "SGD", "USD"];

/// Filesystem locations; everything defaults relative to `base_dir`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Paths {
    pub base_dir: PathBuf,
    pub data_dir: PathBuf,
    /// Report folders and `pipeline.log` are written here.
    pub reports_dir: PathBuf,
    pub transactions_file: PathBuf,
    pub fx_file: PathBuf
}

impl Paths {
    pub fn from_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        let data_dir = base_dir.join(DATA_DIR);

        Self {
            reports_dir: base_dir.join(REPORTS_DIR),
            transactions_file: data_dir.join(TRANSACTIONS_FILE),
            fx_file: data_dir.join(FX_FILE),
            data_dir,
            base_dir
        }
    }
}

impl Default for Paths {
    fn default() -> Self {
        Self::from_base_dir(".")
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub paths: Paths,
    /// Fail the run when any amount cannot be converted.
    pub strict: bool,
    /// Codes accepted as rate columns of the exchange-rate source.
    pub known_currencies: Vec<CurrencyCode>
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            paths: Paths::default(),
            strict: false,
            known_currencies: KNOWN_CURRENCIES.iter()
                .filter_map(|code| CurrencyCode::from_str(code).ok())
                .collect()
        }
    }
}

/// Values given explicitly on the command line; each one wins over the settings file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_dir: Option<PathBuf>,
    pub transactions_file: Option<PathBuf>,
    pub fx_file: Option<PathBuf>,
    pub reports_dir: Option<PathBuf>,
    pub strict: bool
}

impl Settings {
    /// Loads settings from a JSON file. Absent keys keep their defaults.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to deserialize settings file {}", path.display()))
    }

    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(base_dir) = overrides.base_dir {
            self.paths = Paths::from_base_dir(base_dir);
        }

        if let Some(transactions_file) = overrides.transactions_file {
            self.paths.transactions_file = transactions_file;
        }

        if let Some(fx_file) = overrides.fx_file {
            self.paths.fx_file = fx_file;
        }

        if let Some(reports_dir) = overrides.reports_dir {
            self.paths.reports_dir = reports_dir;
        }

        self.strict |= overrides.strict;
        self
    }
}
