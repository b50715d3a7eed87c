mod currency_normalizer;
mod errors;

pub use currency_normalizer::convert_to_usd;
#[cfg(test)]
pub use currency_normalizer::DATE_KEY_COLUMN;
pub use errors::CurrencyConversionError;
