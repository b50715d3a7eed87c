use thiserror::Error;

#[derive(Debug, Error)]
pub enum CurrencyCodeError {
    #[error("Currency code error: {0}")]
    InvalidFormat(String),
    #[error("Currency code error: [{0}] is not a known currency")]
    Unknown(String)
}
