use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CurrencyConversionError {
    #[error("amount_usd could not be computed for {rows} row(s) (missing rate, currency or date)")]
    Unresolved {
        rows: usize
    }
}
