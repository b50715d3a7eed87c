use std::collections::HashMap;

use chrono::{Datelike, Timelike};
use serde_json::Value;
use tracing::debug;

use crate::features::stats;
use crate::features::FeatureError;
use crate::models::{EnrichedTransaction, FeatureRow, LastHourFeatures, Table, FEATURE_COLUMNS};

const LAST_NIGHT_HOUR: u32 = 6;
const RATIO_EPSILON: f64 = 1e-6;

/// Upper bound of `txn_amount_ratio`.
pub const RATIO_CAP: f64 = 1e4;
/// Quantile at which outlier columns are capped.
pub const CLIP_QUANTILE: f64 = 0.99;

/// Columns the enriched table must declare.
pub const REQUIRED_SOURCE_COLUMNS: [&str; 7] = [
    "timestamp", "customer_id", "amount_usd", "is_card_present",
    "is_high_risk_vendor", "is_outside_home_country", "last_hour_activity"
];

#[derive(Debug, Clone, Copy, Default)]
struct CustomerStatistics {
    median: f64,
    std: f64
}

/// Derives the per-transaction feature set from a currency-normalized table.
///
/// Customer aggregates are computed once over the whole table, so every
/// transaction of a customer sees the same median and standard deviation,
/// including amounts that happen after it. Consumers training a temporal
/// model must account for that look-ahead themselves.
///
/// `amount_usd`, `lha_total_amount` and `lha_max_single_amount` are capped at
/// their own 99th percentile, computed from this table on every call. The
/// ratio and customer aggregates use the amounts before capping.
///
/// # Errors
/// Returns `FeatureError` if the table does not declare a required source
/// column, or a row has no timestamp. The input is assumed to be validated.
pub fn build_features(enriched: &Table<EnrichedTransaction>) -> Result<Table<FeatureRow>, FeatureError> {
    ensure_source_columns(enriched)?;

    let customers = customer_statistics(enriched.rows());
    let mut rows = Vec::with_capacity(enriched.len());

    for row in enriched.rows() {
        let transaction = &row.transaction;
        let timestamp = transaction.timestamp
            .ok_or_else(|| FeatureError::missing_timestamp(transaction))?;
        let hour = timestamp.hour();
        let customer = customers.get(transaction.customer_id.as_str()).copied().unwrap_or_default();

        rows.push(FeatureRow {
            enriched: row.clone(),
            hour,
            dayofweek: timestamp.weekday().num_days_from_monday(),
            is_night: u8::from(hour <= LAST_NIGHT_HOUR),
            cust_amount_median: customer.median,
            cust_amount_std: customer.std,
            txn_amount_ratio: row.amount_usd
                .map(|amount| (amount.abs() / (customer.median.abs() + RATIO_EPSILON)).min(RATIO_CAP)),
            last_hour: flatten_activity(transaction.last_hour_activity.as_ref()),
            is_card_not_present: u8::from(!transaction.is_card_present),
            is_high_risk_vendor_f: u8::from(transaction.is_high_risk_vendor),
            is_outside_home_country_f: u8::from(transaction.is_outside_home_country)
        });
    }

    clip_outliers(&mut rows);

    debug!("Built features for {} row(s) across {} customer(s)", rows.len(), customers.len());

    let columns = enriched.columns().iter()
        .filter(|column| !FEATURE_COLUMNS.contains(&column.as_str()))
        .cloned()
        .chain(FEATURE_COLUMNS.iter().map(|column| column.to_string()))
        .collect();

    Ok(Table::new(columns, rows))
}

fn ensure_source_columns(enriched: &Table<EnrichedTransaction>) -> Result<(), FeatureError> {
    let missing: Vec<String> = REQUIRED_SOURCE_COLUMNS.iter()
        .filter(|column| !enriched.has_column(column))
        .map(|column| column.to_string())
        .collect();

    if !missing.is_empty() {
        return Err(FeatureError::MissingColumns { columns: missing });
    }

    Ok(())
}

fn customer_statistics(rows: &[EnrichedTransaction]) -> HashMap<&str, CustomerStatistics> {
    let mut amounts: HashMap<&str, Vec<f64>> = HashMap::new();

    for row in rows {
        let customer = amounts.entry(row.transaction.customer_id.as_str()).or_default();

        if let Some(amount) = row.amount_usd {
            customer.push(amount);
        }
    }

    amounts.into_iter()
        .map(|(customer, values)| {
            let statistics = CustomerStatistics {
                median: stats::median(&values).unwrap_or(0.0),
                std: stats::sample_std(&values).unwrap_or(0.0)
            };

            (customer, statistics)
        })
        .collect()
}

/// Reads the five activity fields. Anything other than a JSON object leaves them all missing.
fn flatten_activity(activity: Option<&Value>) -> LastHourFeatures {
    let Some(Value::Object(record)) = activity else {
        return LastHourFeatures::default();
    };

    let field = |key: &str| record.get(key).and_then(Value::as_f64);

    LastHourFeatures {
        num_transactions: field("num_transactions"),
        total_amount: field("total_amount"),
        unique_merchants: field("unique_merchants"),
        unique_countries: field("unique_countries"),
        max_single_amount: field("max_single_amount")
    }
}

fn threshold(values: impl Iterator<Item = f64>) -> Option<f64> {
    let values: Vec<f64> = values.collect();
    stats::quantile(&values, CLIP_QUANTILE)
}

fn clip_outliers(rows: &mut [FeatureRow]) {
    let amount_usd = threshold(rows.iter().filter_map(|row| row.enriched.amount_usd));
    let total_amount = threshold(rows.iter().filter_map(|row| row.last_hour.total_amount));
    let max_single_amount = threshold(rows.iter().filter_map(|row| row.last_hour.max_single_amount));

    debug!("Outlier thresholds: amount_usd={amount_usd:?} lha_total_amount={total_amount:?} lha_max_single_amount={max_single_amount:?}");

    for row in rows.iter_mut() {
        row.enriched.amount_usd = stats::clip_upper(row.enriched.amount_usd, amount_usd);
        row.last_hour.total_amount = stats::clip_upper(row.last_hour.total_amount, total_amount);
        row.last_hour.max_single_amount = stats::clip_upper(row.last_hour.max_single_amount, max_single_amount);
    }
}
