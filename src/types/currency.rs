use crate::types::errors::CurrencyCodeError;
use serde::{de, Deserialize, Deserializer};
use std::borrow::Borrow;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const CODE_LENGTH: usize = 3;

/// An ISO-4217 style currency code: exactly three upper-case ASCII letters.
///
/// Parsing never changes case, so `eur` is rejected rather than silently
/// matched against an `EUR` rate column.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    #[cfg(test)]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parses `value` and additionally requires it to be one of `known`.
    pub fn parse_known(value: &str, known: &[CurrencyCode]) -> Result<Self, CurrencyCodeError> {
        let code = CurrencyCode::from_str(value)?;

        if !known.contains(&code) {
            return Err(CurrencyCodeError::Unknown(code.0));
        }

        Ok(code)
    }
}

impl Borrow<str> for CurrencyCode {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl Display for CurrencyCode {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

impl FromStr for CurrencyCode {
    type Err = CurrencyCodeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();

        if value.is_empty() {
            return Err(CurrencyCodeError::InvalidFormat("Value is an empty string".to_string()));
        }

        if value.len() != CODE_LENGTH {
            return Err(CurrencyCodeError::InvalidFormat(format!("[{value}] must be {CODE_LENGTH} letters long")));
        }

        if !value.bytes().all(|byte| byte.is_ascii_uppercase()) {
            return Err(CurrencyCodeError::InvalidFormat(format!("[{value}] must only contain upper-case ASCII letters")));
        }

        Ok(CurrencyCode(value.to_string()))
    }
}

impl<'de> Deserialize<'de> for CurrencyCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        CurrencyCode::from_str(&value).map_err(de::Error::custom)
    }
}
