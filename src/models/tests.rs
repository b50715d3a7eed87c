use super::fields::{parse_bool, parse_date, parse_timestamp};
use super::{Cell, EnrichedTransaction, Record, Table, Transaction, TRANSACTION_COLUMNS};

use anyhow::{anyhow, Result};
use chrono::{NaiveDate, Timelike};
use csv::ReaderBuilder;
use rust_decimal::Decimal;
use std::str::FromStr;

const HEADER: &str = "transaction_id,customer_id,card_number,timestamp,vendor_category,vendor_type,vendor,amount,currency,country,city,city_size,card_type,is_card_present,device,channel,device_fingerprint,ip_address,is_outside_home_country,is_high_risk_vendor,is_weekend,last_hour_activity,is_fraud";

fn decode(row: &str) -> Result<Transaction> {
    let content = format!("{HEADER}\n{row}");
    let mut reader = ReaderBuilder::new().from_reader(content.as_bytes());

    reader.deserialize::<Transaction>().next()
        .ok_or_else(|| anyhow!("no row decoded"))?
        .map_err(Into::into)
}

#[test]
fn test_timestamp_parsing_accepts_offsets_and_naive_values() -> Result<()> {
    let with_offset = parse_timestamp("2024-10-01T10:00:00+02:00").ok_or_else(|| anyhow!("offset"))?;
    assert_eq!(with_offset.hour(), 8);

    let naive = parse_timestamp("2024-10-01 23:15:00.123456").ok_or_else(|| anyhow!("naive"))?;
    assert_eq!(naive.hour(), 23);

    let pandas_style = parse_timestamp("2024-10-01 10:00:00+00:00").ok_or_else(|| anyhow!("pandas"))?;
    assert_eq!(pandas_style.hour(), 10);

    assert!(parse_timestamp("yesterday").is_none());
    assert!(parse_timestamp("").is_none());

    Ok(())
}

#[test]
fn test_date_parsing_reduces_timestamps_to_utc_dates() {
    assert_eq!(parse_date("2024-10-01"), NaiveDate::from_ymd_opt(2024, 10, 1));
    assert_eq!(parse_date("2024-10-01T23:30:00-02:00"), NaiveDate::from_ymd_opt(2024, 10, 2));
    assert_eq!(parse_date("01/10/2024"), None);
}

#[test]
fn test_bool_parsing_is_case_insensitive() {
    assert_eq!(parse_bool("True"), Some(true));
    assert_eq!(parse_bool("FALSE"), Some(false));
    assert_eq!(parse_bool("1"), Some(true));
    assert_eq!(parse_bool("maybe"), None);
}

#[test]
fn test_transaction_decodes_nested_activity_and_flags() -> Result<()> {
    let transaction = decode(r#"t1,c1,1234,2024-10-01T10:00:00Z,Retail,online,ShopA,100.50,EUR,DE,Berlin,large,Basic Credit,False,Chrome,web,df1,1.1.1.1,True,false,0,"{""num_transactions"": 3, ""total_amount"": 250.0}",1"#)?;

    assert_eq!(transaction.amount, Some(Decimal::from_str("100.50")?));
    assert!(!transaction.is_card_present);
    assert!(transaction.is_outside_home_country);
    assert_eq!(transaction.is_fraud, 1);

    let activity = transaction.last_hour_activity.ok_or_else(|| anyhow!("activity missing"))?;
    assert_eq!(activity["num_transactions"].as_f64(), Some(3.0));

    Ok(())
}

#[test]
fn test_transaction_coerces_bad_timestamp_and_keeps_non_json_activity() -> Result<()> {
    let transaction = decode("t1,c1,1234,not-a-time,Retail,online,ShopA,,USD,US,NYC,large,Basic Credit,true,Chrome,web,df1,1.1.1.1,false,false,false,garbage,0")?;

    assert!(transaction.timestamp.is_none());
    assert!(transaction.amount.is_none());
    assert_eq!(transaction.last_hour_activity, Some(serde_json::Value::String("garbage".to_string())));

    Ok(())
}

#[test]
fn test_transaction_rejects_invalid_boolean() {
    let result = decode("t1,c1,1234,2024-10-01T10:00:00Z,Retail,online,ShopA,1.0,USD,US,NYC,large,Basic Credit,perhaps,Chrome,web,df1,1.1.1.1,false,false,false,,0");

    assert!(result.is_err());
}

#[test]
fn test_records_expose_cells_by_column_name() -> Result<()> {
    let transaction = decode("t1,c1,1234,2024-10-01T10:00:00Z,Retail,online,ShopA,10,USD,US,NYC,large,Basic Credit,true,Chrome,web,df1,1.1.1.1,false,false,false,,0")?;
    let enriched = EnrichedTransaction { transaction, amount_usd: None };

    assert_eq!(enriched.cell("amount"), Cell::Number(10.0));
    assert_eq!(enriched.cell("amount_usd"), Cell::Null);
    assert_eq!(enriched.cell("is_card_present"), Cell::Bool(true));
    assert_eq!(enriched.cell("timestamp").to_string(), "2024-10-01T10:00:00Z");
    assert_eq!(enriched.cell("no_such_column"), Cell::Null);

    Ok(())
}

#[test]
fn test_table_reports_declared_columns() {
    let columns = TRANSACTION_COLUMNS.iter().map(|column| column.to_string()).collect();
    let table: Table<Transaction> = Table::new(columns, Vec::new());

    assert!(table.has_column("last_hour_activity"));
    assert!(!table.has_column("amount_usd"));
    assert!(table.is_empty());
}
