use crate::models::{Cell, EnrichedTransaction, Record};

/// Columns appended by the feature builder, in output order.
pub const FEATURE_COLUMNS: [&str; 14] = [
    "hour", "dayofweek", "is_night",
    "cust_amount_median", "cust_amount_std", "txn_amount_ratio",
    "lha_num_transactions", "lha_total_amount", "lha_unique_merchants",
    "lha_unique_countries", "lha_max_single_amount",
    "is_card_not_present", "is_high_risk_vendor_f", "is_outside_home_country_f"
];

/// The flattened `last_hour_activity` record.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LastHourFeatures {
    pub num_transactions: Option<f64>,
    pub total_amount: Option<f64>,
    pub unique_merchants: Option<f64>,
    pub unique_countries: Option<f64>,
    pub max_single_amount: Option<f64>
}

/// An enriched transaction with its derived features.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    /// The enriched row; `amount_usd` here is already clipped at the table's 99th percentile.
    pub enriched: EnrichedTransaction,
    pub hour: u32,
    /// Monday = 0 .. Sunday = 6.
    pub dayofweek: u32,
    pub is_night: u8,
    pub cust_amount_median: f64,
    pub cust_amount_std: f64,
    pub txn_amount_ratio: Option<f64>,
    pub last_hour: LastHourFeatures,
    pub is_card_not_present: u8,
    pub is_high_risk_vendor_f: u8,
    pub is_outside_home_country_f: u8
}

impl Record for FeatureRow {
    fn cell(&self, column: &str) -> Cell {
        match column {
            "hour" => Cell::Number(f64::from(self.hour)),
            "dayofweek" => Cell::Number(f64::from(self.dayofweek)),
            "is_night" => Cell::from_flag(self.is_night),
            "cust_amount_median" => Cell::Number(self.cust_amount_median),
            "cust_amount_std" => Cell::Number(self.cust_amount_std),
            "txn_amount_ratio" => Cell::from_option(self.txn_amount_ratio),
            "lha_num_transactions" => Cell::from_option(self.last_hour.num_transactions),
            "lha_total_amount" => Cell::from_option(self.last_hour.total_amount),
            "lha_unique_merchants" => Cell::from_option(self.last_hour.unique_merchants),
            "lha_unique_countries" => Cell::from_option(self.last_hour.unique_countries),
            "lha_max_single_amount" => Cell::from_option(self.last_hour.max_single_amount),
            "is_card_not_present" => Cell::from_flag(self.is_card_not_present),
            "is_high_risk_vendor_f" => Cell::from_flag(self.is_high_risk_vendor_f),
            "is_outside_home_country_f" => Cell::from_flag(self.is_outside_home_country_f),
            _ => self.enriched.cell(column)
        }
    }
}
