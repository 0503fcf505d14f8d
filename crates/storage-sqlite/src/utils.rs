//! Conversions between stored TEXT columns and domain values.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::errors::StorageError;

/// Parses a decimal stored as TEXT.
pub fn parse_decimal(column: &str, raw: &str) -> Result<Decimal, StorageError> {
    Decimal::from_str(raw)
        .map_err(|e| StorageError::CorruptValue(format!("{} '{}': {}", column, raw, e)))
}

pub fn parse_optional_decimal(
    column: &str,
    raw: Option<&str>,
) -> Result<Option<Decimal>, StorageError> {
    raw.map(|value| parse_decimal(column, value)).transpose()
}

/// Parses an enum stored as TEXT through its `FromStr` impl.
pub fn parse_enum<T: FromStr>(column: &str, raw: &str) -> Result<T, StorageError> {
    raw.parse::<T>()
        .map_err(|_| StorageError::CorruptValue(format!("{} '{}'", column, raw)))
}

/// Canonical TEXT form of a decimal.
pub fn decimal_text(value: Decimal) -> String {
    value.normalize().to_string()
}
