use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::Table;
use crate::types::CurrencyCode;

pub const FX_DATE_COLUMN: &str = "date";

/// One day of the historical exchange-rate table.
#[derive(Debug, Clone, PartialEq)]
pub struct FxRow {
    /// `None` when the source date could not be parsed.
    pub date: Option<NaiveDate>,
    /// Units of each currency per one reference unit, indexed by rate column.
    pub rates: Vec<Option<f64>>
}

impl FxRow {
    pub fn rate(&self, column: usize) -> Option<f64> {
        self.rates.get(column).copied().flatten()
    }
}

/// The exchange-rate table together with its explicit currency mapping.
///
/// The mapping from currency code to rate column is fixed when the table is
/// built; callers never infer currencies from column names afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct FxTable {
    table: Table<FxRow>,
    currencies: BTreeMap<CurrencyCode, usize>
}

impl FxTable {
    pub fn new(table: Table<FxRow>, currencies: BTreeMap<CurrencyCode, usize>) -> Self {
        Self { table, currencies }
    }

    pub fn columns(&self) -> &[String] {
        self.table.columns()
    }

    pub fn rows(&self) -> &[FxRow] {
        self.table.rows()
    }

    pub fn currencies(&self) -> impl Iterator<Item = &CurrencyCode> {
        self.currencies.keys()
    }

    /// Looks up the rate column for a currency. The match is exact and case-sensitive.
    pub fn rate_column(&self, currency: &str) -> Option<usize> {
        self.currencies.get(currency).copied()
    }
}
