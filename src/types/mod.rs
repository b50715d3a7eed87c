mod currency;
mod errors;
#[cfg(test)]
mod tests;

pub use currency::CurrencyCode;
pub use errors::CurrencyCodeError;

pub type TransactionId = String;
pub type CustomerId = String;

/// Every amount is normalized into this currency.
pub const REFERENCE_CURRENCY: &str = "USD";
