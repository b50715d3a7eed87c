use super::{CurrencyCode, CurrencyCodeError, REFERENCE_CURRENCY};
use anyhow::Result;
use std::collections::BTreeMap;
use std::str::FromStr;

#[test]
fn test_currency_code_parses_valid_codes() -> Result<()> {
    let test_cases = vec![
        ("USD", "USD"),
        ("EUR", "EUR"),
        ("  JPY  ", "JPY"),
    ];

    for (input_string, expected_output) in test_cases {
        assert_eq!(CurrencyCode::from_str(input_string)?.to_string(), expected_output);
    }

    Ok(())
}

#[test]
fn test_currency_code_rejects_invalid_codes() {
    assert!(CurrencyCode::from_str("").is_err());
    assert!(CurrencyCode::from_str("eur").is_err());
    assert!(CurrencyCode::from_str("EURO").is_err());
    assert!(CurrencyCode::from_str("E1R").is_err());
    assert!(CurrencyCode::from_str("date").is_err());
}

#[test]
fn test_currency_code_must_be_known_when_requested() -> Result<()> {
    let known = vec![CurrencyCode::from_str("USD")?, CurrencyCode::from_str("EUR")?];

    assert_eq!(CurrencyCode::parse_known("EUR", &known)?.as_str(), "EUR");
    assert!(matches!(CurrencyCode::parse_known("GBP", &known), Err(CurrencyCodeError::Unknown(_))));
    assert!(matches!(CurrencyCode::parse_known("gbp", &known), Err(CurrencyCodeError::InvalidFormat(_))));

    Ok(())
}

#[test]
fn test_currency_code_map_can_be_queried_by_str() -> Result<()> {
    let mut columns = BTreeMap::new();
    columns.insert(CurrencyCode::from_str(REFERENCE_CURRENCY)?, 0usize);

    assert_eq!(columns.get("USD"), Some(&0));
    assert_eq!(columns.get("usd"), None);

    Ok(())
}
