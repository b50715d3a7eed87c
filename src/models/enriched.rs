use crate::models::{Cell, Record, Transaction};

pub const AMOUNT_USD_COLUMN: &str = "amount_usd";

/// A transaction after currency normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedTransaction {
    pub transaction: Transaction,
    /// Amount in the reference currency; `None` when no rate could be resolved.
    pub amount_usd: Option<f64>
}

impl Record for EnrichedTransaction {
    fn cell(&self, column: &str) -> Cell {
        match column {
            AMOUNT_USD_COLUMN => Cell::from_option(self.amount_usd),
            _ => self.transaction.cell(column)
        }
    }
}
