//! Helpers for turning raw form input into validated ledger values.
//!
//! Form fields arrive either as strings (HTML inputs) or as JSON numbers. The
//! serde helpers accept both and keep the raw text, so validation can report
//! the first missing or unparseable field by name.
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

use crate::error::{LedgerError, LedgerResult};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawField {
    Text(String),
    Number(f64),
}

impl RawField {
    fn into_text(self) -> String {
        match self {
            RawField::Text(s) => s,
            RawField::Number(n) => n.to_string(),
        }
    }
}

pub fn deserialize_field<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<RawField> = Option::deserialize(deserializer)?;
    Ok(raw.map(RawField::into_text).unwrap_or_default())
}

pub fn deserialize_optional_field<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<RawField> = Option::deserialize(deserializer)?;
    Ok(raw.map(RawField::into_text))
}

/// Largest amount or quantity a form may submit. Keeps every cent total
/// far away from `i64::MAX`.
pub const MAX_AMOUNT: f64 = 1_000_000_000_000.0;

pub fn to_cents(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

pub fn required_text(field: &'static str, value: &str) -> LedgerResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::validation(field, "is required"));
    }
    Ok(trimmed.to_string())
}

/// Empty and whitespace-only input counts as absent.
pub fn optional_text(value: Option<&String>) -> Option<String> {
    value
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Parses a finite decimal number.
pub fn parse_number(field: &'static str, value: &str) -> LedgerResult<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::validation(field, "is required"));
    }
    let parsed = trimmed
        .parse::<f64>()
        .map_err(|_| LedgerError::validation(field, format!("'{}' is not a number", trimmed)))?;
    check_finite(field, parsed)
}

pub fn parse_optional_number(field: &'static str, value: Option<&String>) -> LedgerResult<Option<f64>> {
    match optional_text(value) {
        Some(s) => parse_number(field, &s).map(Some),
        None => Ok(None),
    }
}

pub fn check_finite(field: &'static str, value: f64) -> LedgerResult<f64> {
    if !value.is_finite() {
        return Err(LedgerError::validation(field, "must be a finite number"));
    }
    Ok(value)
}

fn check_bounded(field: &'static str, value: f64) -> LedgerResult<f64> {
    check_finite(field, value)?;
    if value > MAX_AMOUNT {
        return Err(LedgerError::validation(
            field,
            format!("must not exceed {}", MAX_AMOUNT),
        ));
    }
    Ok(value)
}

pub fn require_positive(field: &'static str, value: f64) -> LedgerResult<f64> {
    check_bounded(field, value)?;
    if value <= 0.0 {
        return Err(LedgerError::validation(field, "must be greater than zero"));
    }
    Ok(value)
}

pub fn require_non_negative(field: &'static str, value: f64) -> LedgerResult<f64> {
    check_bounded(field, value)?;
    if value < 0.0 {
        return Err(LedgerError::validation(field, "must not be negative"));
    }
    Ok(value)
}

/// Sums cents, pinning at the `i64` limits instead of overflowing.
pub fn sum_cents(values: impl IntoIterator<Item = i64>) -> i64 {
    values.into_iter().fold(0, i64::saturating_add)
}

/// Parses an optional `YYYY-MM-DD` date, falling back to `default` when blank.
pub fn parse_date_or(
    field: &'static str,
    value: Option<&String>,
    default: NaiveDate,
) -> LedgerResult<NaiveDate> {
    match optional_text(value) {
        Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|_| {
            LedgerError::validation(field, format!("'{}' is not a YYYY-MM-DD date", s))
        }),
        None => Ok(default),
    }
}

pub fn parse_optional_date(field: &'static str, value: Option<&String>) -> LedgerResult<Option<NaiveDate>> {
    match optional_text(value) {
        Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| LedgerError::validation(field, format!("'{}' is not a YYYY-MM-DD date", s))),
        None => Ok(None),
    }
}

/// Parses a closed-enumeration field such as a category or trade side.
pub fn parse_choice<T>(field: &'static str, value: &str) -> LedgerResult<T>
where
    T: std::str::FromStr<Err = String>,
{
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::validation(field, "is required"));
    }
    trimmed
        .parse::<T>()
        .map_err(|e| LedgerError::validation(field, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "deserialize_field")]
        amount: String,
        #[serde(default, deserialize_with = "deserialize_optional_field")]
        rate: Option<String>,
    }

    #[test]
    fn test_field_accepts_number_or_string() {
        let a: Sample = serde_json::from_str(r#"{"amount": 85.5}"#).unwrap();
        assert_eq!(a.amount, "85.5");
        assert!(a.rate.is_none());

        let b: Sample = serde_json::from_str(r#"{"amount": "12", "rate": 4}"#).unwrap();
        assert_eq!(b.amount, "12");
        assert_eq!(b.rate.as_deref(), Some("4"));
    }

    #[test]
    fn test_missing_field_is_empty() {
        let s: Sample = serde_json::from_str("{}").unwrap();
        assert_eq!(s.amount, "");
    }

    #[test]
    fn test_to_cents_rounds() {
        assert_eq!(to_cents(185.5), 18550);
        assert_eq!(to_cents(15.99), 1599);
        assert_eq!(to_cents(0.005), 1);
    }

    #[test]
    fn test_parse_number_rejects_garbage() {
        assert!(parse_number("amount", "abc").is_err());
        assert!(parse_number("amount", "  ").is_err());
        assert!(parse_number("amount", "NaN").is_err());
        assert!(parse_number("amount", "inf").is_err());
        assert_eq!(parse_number("amount", " 42.5 ").unwrap(), 42.5);
    }

    #[test]
    fn test_require_positive() {
        assert!(require_positive("price", 0.0).is_err());
        assert!(require_positive("price", -1.0).is_err());
        assert!(require_positive("price", f64::INFINITY).is_err());
        assert_eq!(require_positive("price", 1.5).unwrap(), 1.5);
    }

    #[test]
    fn test_amounts_are_capped() {
        assert_eq!(require_non_negative("value", MAX_AMOUNT).unwrap(), MAX_AMOUNT);
        assert!(matches!(
            require_non_negative("value", 90_000_000_000_000_000.0),
            Err(LedgerError::Validation { field: "value", .. })
        ));
        assert!(matches!(
            require_positive("quantity", MAX_AMOUNT * 2.0),
            Err(LedgerError::Validation { field: "quantity", .. })
        ));
    }

    #[test]
    fn test_sum_cents_saturates() {
        assert_eq!(sum_cents([1, 2, 3]), 6);
        assert_eq!(sum_cents([i64::MAX, 1]), i64::MAX);
        assert_eq!(sum_cents([i64::MIN, -1]), i64::MIN);
        assert_eq!(sum_cents(Vec::new()), 0);
    }

    #[test]
    fn test_optional_text_blank_is_none() {
        assert_eq!(optional_text(Some(&"   ".to_string())), None);
        assert_eq!(optional_text(Some(&" note ".to_string())), Some("note".into()));
        assert_eq!(optional_text(None), None);
    }

    #[test]
    fn test_parse_date_or_default() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(parse_date_or("date", None, today).unwrap(), today);
        assert_eq!(
            parse_date_or("date", Some(&"2024-02-01".to_string()), today).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
        );
        assert!(parse_date_or("date", Some(&"01/02/2024".to_string()), today).is_err());
    }
}
