use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;
use serde_json::Value;

use crate::models::fields;
use crate::models::{Cell, Record};
use crate::types::{CustomerId, TransactionId};

/// Columns every transactions source must declare.
pub const TRANSACTION_COLUMNS: [&str; 23] = [
    "transaction_id", "customer_id", "card_number", "timestamp",
    "vendor_category", "vendor_type", "vendor", "amount", "currency",
    "country", "city", "city_size", "card_type", "is_card_present",
    "device", "channel", "device_fingerprint", "ip_address",
    "is_outside_home_country", "is_high_risk_vendor", "is_weekend",
    "last_hour_activity", "is_fraud"
];

/// Represents a single payment event from the transactions source.
///
/// `timestamp` is `None` when the source value could not be parsed; the
/// schema validator refuses such tables, so later stages may rely on it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Transaction {
    pub transaction_id: TransactionId,
    pub customer_id: CustomerId,
    pub card_number: String,
    #[serde(deserialize_with = "fields::lenient_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
    pub vendor_category: String,
    pub vendor_type: String,
    pub vendor: String,
    /// Amount in the transaction's own currency.
    #[serde(deserialize_with = "fields::optional_decimal")]
    pub amount: Option<Decimal>,
    /// Currency code exactly as it appears in the source.
    pub currency: String,
    pub country: String,
    pub city: String,
    pub city_size: String,
    pub card_type: String,
    #[serde(deserialize_with = "fields::lenient_bool")]
    pub is_card_present: bool,
    pub device: String,
    pub channel: String,
    pub device_fingerprint: String,
    pub ip_address: String,
    #[serde(deserialize_with = "fields::lenient_bool")]
    pub is_outside_home_country: bool,
    #[serde(deserialize_with = "fields::lenient_bool")]
    pub is_high_risk_vendor: bool,
    #[serde(deserialize_with = "fields::lenient_bool")]
    pub is_weekend: bool,
    /// Summary of the customer's activity in the preceding hour, if recorded.
    #[serde(deserialize_with = "fields::activity_record")]
    pub last_hour_activity: Option<Value>,
    #[serde(deserialize_with = "fields::lenient_flag")]
    pub is_fraud: u8
}

impl Record for Transaction {
    fn cell(&self, column: &str) -> Cell {
        let text = |value: &str| Cell::Text(value.to_string());

        match column {
            "transaction_id" => text(&self.transaction_id),
            "customer_id" => text(&self.customer_id),
            "card_number" => text(&self.card_number),
            "timestamp" => self.timestamp
                .map_or(Cell::Null, |timestamp| Cell::Text(timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true))),
            "vendor_category" => text(&self.vendor_category),
            "vendor_type" => text(&self.vendor_type),
            "vendor" => text(&self.vendor),
            "amount" => Cell::from_option(self.amount.and_then(|amount| amount.to_f64())),
            "currency" => text(&self.currency),
            "country" => text(&self.country),
            "city" => text(&self.city),
            "city_size" => text(&self.city_size),
            "card_type" => text(&self.card_type),
            "is_card_present" => Cell::Bool(self.is_card_present),
            "device" => text(&self.device),
            "channel" => text(&self.channel),
            "device_fingerprint" => text(&self.device_fingerprint),
            "ip_address" => text(&self.ip_address),
            "is_outside_home_country" => Cell::Bool(self.is_outside_home_country),
            "is_high_risk_vendor" => Cell::Bool(self.is_high_risk_vendor),
            "is_weekend" => Cell::Bool(self.is_weekend),
            "last_hour_activity" => self.last_hour_activity.as_ref()
                .map_or(Cell::Null, |activity| Cell::Text(activity.to_string())),
            "is_fraud" => Cell::from_flag(self.is_fraud),
            _ => Cell::Null
        }
    }
}
