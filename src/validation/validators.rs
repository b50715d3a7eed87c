use std::collections::BTreeSet;

use crate::models::{FxTable, Table, Transaction, FX_DATE_COLUMN, TRANSACTION_COLUMNS};
use crate::types::REFERENCE_CURRENCY;
use crate::validation::SchemaValidationError;

const TRANSACTIONS: &str = "transactions";
const FX: &str = "fx";

pub const FX_REQUIRED_COLUMNS: [&str; 2] = [FX_DATE_COLUMN, REFERENCE_CURRENCY];

/// Fails when any of `required` is absent from `columns`. Missing names are reported sorted.
pub fn ensure_columns<S: AsRef<str>>(columns: &[S], required: &[&str], table: &str) -> Result<(), SchemaValidationError> {
    let present: BTreeSet<&str> = columns.iter().map(AsRef::as_ref).collect();
    let missing: BTreeSet<&str> = required.iter().copied()
        .filter(|column| !present.contains(column))
        .collect();

    if !missing.is_empty() {
        return Err(SchemaValidationError::missing_columns(table, missing.into_iter().map(String::from).collect()));
    }

    Ok(())
}

pub fn ensure_not_empty<R>(rows: &[R], table: &str) -> Result<(), SchemaValidationError> {
    if rows.is_empty() {
        return Err(SchemaValidationError::empty_table(table));
    }

    Ok(())
}

/// Gate for the transactions table.
///
/// # Errors
/// Returns `SchemaValidationError` if:
/// - The table has no rows.
/// - A required column is not declared.
/// - Any `timestamp` failed to parse.
/// - Any `amount` is negative.
pub fn validate_transactions(table: &Table<Transaction>) -> Result<(), SchemaValidationError> {
    ensure_not_empty(table.rows(), TRANSACTIONS)?;
    ensure_columns(table.columns(), &TRANSACTION_COLUMNS, TRANSACTIONS)?;

    let unparsed = table.rows().iter()
        .filter(|transaction| transaction.timestamp.is_none())
        .count();

    if unparsed > 0 {
        return Err(SchemaValidationError::unparseable_temporal(TRANSACTIONS, "timestamp", unparsed));
    }

    let negative = table.rows().iter()
        .filter(|transaction| transaction.amount.is_some_and(|amount| amount.is_sign_negative() && !amount.is_zero()))
        .count();

    if negative > 0 {
        return Err(SchemaValidationError::negative_amount(TRANSACTIONS, negative));
    }

    Ok(())
}

/// Gate for the exchange-rate table: non-empty, `date` and the reference
/// currency declared, every date parsed.
pub fn validate_fx(table: &FxTable) -> Result<(), SchemaValidationError> {
    ensure_not_empty(table.rows(), FX)?;
    ensure_columns(table.columns(), &FX_REQUIRED_COLUMNS, FX)?;

    let unparsed = table.rows().iter()
        .filter(|row| row.date.is_none())
        .count();

    if unparsed > 0 {
        return Err(SchemaValidationError::unparseable_temporal(FX, FX_DATE_COLUMN, unparsed));
    }

    Ok(())
}
