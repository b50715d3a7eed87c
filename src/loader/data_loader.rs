use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use csv::{Reader, ReaderBuilder, Trim};
use tokio::task::{spawn_blocking, JoinHandle};
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::loader::LoaderError;
use crate::models::fields::{parse_date, parse_rate};
use crate::models::{FxRow, FxTable, Table, Transaction, FX_DATE_COLUMN, TRANSACTION_COLUMNS};
use crate::types::{CurrencyCode, CurrencyCodeError, REFERENCE_CURRENCY};
use crate::validation::{ensure_columns, validate_fx, validate_transactions, FX_REQUIRED_COLUMNS};

fn open_csv(path: &Path) -> Result<(Reader<BufReader<File>>, Vec<String>), LoaderError> {
    if !path.exists() {
        return Err(LoaderError::FileNotFound { path: path.to_path_buf() });
    }

    let file = File::open(path).map_err(|source| LoaderError::Io { path: path.to_path_buf(), source })?;
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .from_reader(BufReader::new(file));

    let columns = reader.headers()
        .map_err(|error| LoaderError::csv(path, error))?
        .iter()
        .map(String::from)
        .collect();

    Ok((reader, columns))
}

/// Reads and validates the transactions source.
///
/// The header is checked before any row is decoded. A row that cannot be
/// decoded fails the whole load. Columns outside the required set are not
/// carried, so the table only declares the required columns.
pub fn load_transactions(path: &Path) -> Result<Table<Transaction>, LoaderError> {
    let (mut reader, columns) = open_csv(path)?;
    ensure_columns(&columns, &TRANSACTION_COLUMNS, "transactions")?;

    let rows = reader.deserialize::<Transaction>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|error| LoaderError::csv(path, error))?;

    let (columns, ignored): (Vec<String>, Vec<String>) = columns.into_iter()
        .partition(|column| TRANSACTION_COLUMNS.contains(&column.as_str()));

    if !ignored.is_empty() {
        debug!("Ignoring transaction column(s) outside the required set: {}", ignored.join(", "));
    }

    let table = Table::new(columns, rows);
    validate_transactions(&table)?;

    info!("Loaded {} transaction(s) from {}", table.len(), path.display());

    Ok(table)
}

/// Reads and validates the exchange-rate source.
///
/// Every column other than `date` is checked once against `known`; known
/// codes become rate columns, anything else is logged and left out of the
/// currency mapping. The reference currency is always accepted. Codes are
/// matched exactly, so a lower-case header such as `eur` is never usable as
/// a rate column and transactions in that currency convert to `None`.
pub fn load_fx(path: &Path, known: &[CurrencyCode]) -> Result<FxTable, LoaderError> {
    let (mut reader, columns) = open_csv(path)?;
    ensure_columns(&columns, &FX_REQUIRED_COLUMNS, "fx")?;

    let mut currencies = BTreeMap::new();
    let mut rate_positions = Vec::new();
    let mut date_position = 0;

    for (position, name) in columns.iter().enumerate() {
        if name == FX_DATE_COLUMN {
            date_position = position;
            continue;
        }

        match currency_column(name, known) {
            Ok(code) => {
                currencies.insert(code, rate_positions.len());
                rate_positions.push(position);
            }
            Err(error) => warn!("Ignoring exchange-rate column [{name}]: {error}")
        }
    }

    let mut rows = Vec::new();

    for record in reader.records() {
        let record = record.map_err(|error| LoaderError::csv(path, error))?;

        rows.push(FxRow {
            date: record.get(date_position).and_then(parse_date),
            rates: rate_positions.iter()
                .map(|&position| record.get(position).and_then(parse_rate))
                .collect()
        });
    }

    let table = FxTable::new(Table::new(columns, rows), currencies);
    validate_fx(&table)?;

    info!("Loaded {} exchange-rate day(s) for {} currencies from {}", table.rows().len(), table.currencies().count(), path.display());

    Ok(table)
}

fn currency_column(name: &str, known: &[CurrencyCode]) -> Result<CurrencyCode, CurrencyCodeError> {
    if name == REFERENCE_CURRENCY {
        return CurrencyCode::from_str(name);
    }

    CurrencyCode::parse_known(name, known)
}

pub fn spawn_transactions_load(path: PathBuf) -> JoinHandle<Result<Table<Transaction>, LoaderError>> {
    spawn_blocking(move || load_transactions(&path))
}

/// Loads both sources concurrently on blocking tasks.
pub async fn load_sources(settings: &Settings) -> anyhow::Result<(Table<Transaction>, FxTable)> {
    let fx_path = settings.paths.fx_file.clone();
    let known = settings.known_currencies.clone();

    let transactions = spawn_transactions_load(settings.paths.transactions_file.clone());
    let fx = spawn_blocking(move || load_fx(&fx_path, &known));

    let (transactions, fx) = tokio::try_join!(transactions, fx)?;

    Ok((transactions?, fx?))
}
