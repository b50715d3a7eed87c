use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use tracing::{debug, warn};

use crate::models::{EnrichedTransaction, FxRow, FxTable, Table, Transaction, AMOUNT_USD_COLUMN, FX_DATE_COLUMN};
use crate::normalizer::CurrencyConversionError;

/// Name of the transient join key, never present in the output.
pub const DATE_KEY_COLUMN: &str = "date_only";

/// Converts every transaction amount into the reference currency.
///
/// Transactions are left-joined to `fx` on their UTC calendar date, so each
/// transaction is kept even without a matching day; a day that appears more
/// than once in `fx` yields one output row per match. A row converts to
/// `amount / rate` when its currency maps to a rate column and the rate is
/// present and non-zero, otherwise `amount_usd` is `None`.
///
/// Neither input is modified. The output declares the transaction columns
/// minus any join scaffolding, followed by `amount_usd`.
///
/// # Errors
/// Returns `CurrencyConversionError::Unresolved` when `strict` is set and at
/// least one row could not be converted. Without `strict` the count is only
/// logged.
pub fn convert_to_usd(transactions: &Table<Transaction>, fx: &FxTable, strict: bool) -> Result<Table<EnrichedTransaction>, CurrencyConversionError> {
    let days = index_by_date(fx);
    let mut rows = Vec::with_capacity(transactions.len());

    for transaction in transactions.rows() {
        let matches = transaction.timestamp
            .map(|timestamp| timestamp.date_naive())
            .and_then(|date| days.get(&date));

        match matches {
            Some(matches) => {
                for day in matches {
                    rows.push(EnrichedTransaction {
                        transaction: transaction.clone(),
                        amount_usd: convert(transaction, fx, day)
                    });
                }
            }
            None => rows.push(EnrichedTransaction {
                transaction: transaction.clone(),
                amount_usd: None
            })
        }
    }

    let unresolved = rows.iter().filter(|row| row.amount_usd.is_none()).count();

    if unresolved > 0 {
        let error = CurrencyConversionError::Unresolved { rows: unresolved };

        if strict {
            return Err(error);
        }

        warn!("{error}");
    }

    debug!("Converted {} of {} row(s) into the reference currency", rows.len() - unresolved, rows.len());

    Ok(Table::new(output_columns(transactions, fx), rows))
}

fn convert(transaction: &Transaction, fx: &FxTable, day: &FxRow) -> Option<f64> {
    let rate = fx.rate_column(&transaction.currency)
        .and_then(|column| day.rate(column))
        .filter(|rate| rate.is_finite() && *rate != 0.0);
    let amount = transaction.amount.and_then(|amount| amount.to_f64());

    amount.zip(rate).map(|(amount, rate)| amount / rate)
}

fn index_by_date(fx: &FxTable) -> HashMap<NaiveDate, Vec<&FxRow>> {
    let mut days: HashMap<NaiveDate, Vec<&FxRow>> = HashMap::with_capacity(fx.rows().len());

    for row in fx.rows() {
        if let Some(date) = row.date {
            days.entry(date).or_default().push(row);
        }
    }

    let duplicated = days.values().filter(|rows| rows.len() > 1).count();

    if duplicated > 0 {
        warn!("Exchange-rate table repeats {duplicated} date(s); matching transactions will be duplicated");
    }

    days
}

fn output_columns(transactions: &Table<Transaction>, fx: &FxTable) -> Vec<String> {
    let scaffolding: HashSet<&str> = [DATE_KEY_COLUMN, FX_DATE_COLUMN].into_iter()
        .chain(fx.columns().iter().map(String::as_str))
        .chain([AMOUNT_USD_COLUMN])
        .collect();

    transactions.columns().iter()
        .filter(|column| !scaffolding.contains(column.as_str()))
        .cloned()
        .chain([AMOUNT_USD_COLUMN.to_string()])
        .collect()
}
