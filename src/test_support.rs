//! Fixture builders shared by the unit tests.

use std::collections::BTreeMap;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use rust_decimal::Decimal;
use serde_json::{json, Value};

use crate::models::fields::{parse_date, parse_timestamp};
use crate::models::{FxRow, FxTable, Table, Transaction, FX_DATE_COLUMN, TRANSACTION_COLUMNS};
use crate::types::CurrencyCode;

pub fn transaction(transaction_id: &str, customer_id: &str, timestamp: &str, amount: &str, currency: &str) -> Result<Transaction> {
    Ok(Transaction {
        transaction_id: transaction_id.to_string(),
        customer_id: customer_id.to_string(),
        card_number: "1234".to_string(),
        timestamp: Some(parse_timestamp(timestamp).ok_or_else(|| anyhow!("bad fixture timestamp [{timestamp}]"))?),
        vendor_category: "Retail".to_string(),
        vendor_type: "online".to_string(),
        vendor: "ShopA".to_string(),
        amount: Some(Decimal::from_str(amount)?),
        currency: currency.to_string(),
        country: "DE".to_string(),
        city: "Berlin".to_string(),
        city_size: "large".to_string(),
        card_type: "Basic Credit".to_string(),
        is_card_present: false,
        device: "Chrome".to_string(),
        channel: "web".to_string(),
        device_fingerprint: "df1".to_string(),
        ip_address: "1.1.1.1".to_string(),
        is_outside_home_country: true,
        is_high_risk_vendor: false,
        is_weekend: false,
        last_hour_activity: None,
        is_fraud: 0
    })
}

pub fn transaction_columns() -> Vec<String> {
    TRANSACTION_COLUMNS.iter().map(|column| column.to_string()).collect()
}

pub fn transaction_table(rows: Vec<Transaction>) -> Table<Transaction> {
    Table::new(transaction_columns(), rows)
}

pub fn activity(num_transactions: i64, total_amount: f64, max_single_amount: f64) -> Value {
    json!({
        "num_transactions": num_transactions,
        "total_amount": total_amount,
        "unique_merchants": 1,
        "unique_countries": 1,
        "max_single_amount": max_single_amount
    })
}

/// Builds an exchange-rate table with one rate column per entry of `currencies`.
pub fn fx_table(currencies: &[&str], days: &[(&str, Vec<Option<f64>>)]) -> Result<FxTable> {
    let mut columns = vec![FX_DATE_COLUMN.to_string()];
    let mut mapping = BTreeMap::new();

    for (index, currency) in currencies.iter().enumerate() {
        columns.push(currency.to_string());
        mapping.insert(CurrencyCode::from_str(currency)?, index);
    }

    let rows = days.iter()
        .map(|(date, rates)| FxRow { date: parse_date(date), rates: rates.clone() })
        .collect();

    Ok(FxTable::new(Table::new(columns, rows), mapping))
}

/// Two transactions of one customer on 2024-10-01: 100 EUR with a nested
/// activity record and 200 USD with an empty one.
pub fn sample_transactions() -> Result<Table<Transaction>> {
    let mut first = transaction("t1", "c1", "2024-10-01T10:00:00Z", "100.0", "EUR")?;
    first.last_hour_activity = Some(activity(1, 100.0, 100.0));

    let mut second = transaction("t2", "c1", "2024-10-01T11:00:00Z", "200.0", "USD")?;
    second.last_hour_activity = Some(json!({}));
    second.is_high_risk_vendor = true;
    second.is_outside_home_country = false;
    second.is_fraud = 1;

    Ok(transaction_table(vec![first, second]))
}

pub fn sample_fx() -> Result<FxTable> {
    fx_table(&["USD", "EUR"], &[("2024-10-01", vec![Some(1.0), Some(0.9)])])
}
