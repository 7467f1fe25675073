//! Conversions between database column representations and domain types.
//!
//! Decimals and timestamps are stored as canonical strings; enum-like values
//! round-trip through their serde names.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use lossbook_core::errors::{DatabaseError, Error, Result};

pub(crate) fn enum_to_db<T: serde::Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?.trim_matches('"').to_string())
}

pub(crate) fn enum_from_db<T: serde::de::DeserializeOwned>(value: &str) -> Result<T> {
    Ok(serde_json::from_str(&format!("\"{}\"", value))?)
}

pub(crate) fn decimal_to_db(value: Decimal) -> String {
    value.to_string()
}

pub(crate) fn decimal_from_db(value: &str, column: &str) -> Result<Decimal> {
    value.parse().map_err(|_| {
        Error::Database(DatabaseError::Internal(format!(
            "column {column} holds a non-decimal value '{value}'"
        )))
    })
}

pub(crate) fn timestamp_to_db(value: DateTime<Utc>) -> String {
    value.to_rfc3339()
}

pub(crate) fn timestamp_from_db(value: &str, column: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            Error::Database(DatabaseError::Internal(format!(
                "column {column} holds a non-RFC3339 timestamp '{value}': {e}"
            )))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn decimals_round_trip_exactly() {
        for value in [dec!(0), dec!(2.00), dec!(1.5), dec!(25.99)] {
            assert_eq!(
                decimal_from_db(&decimal_to_db(value), "quantity").unwrap(),
                value
            );
        }
    }

    #[test]
    fn timestamps_round_trip() {
        let now = Utc::now();
        assert_eq!(
            timestamp_from_db(&timestamp_to_db(now), "created_at").unwrap(),
            now
        );
    }

    #[test]
    fn corrupt_values_surface_as_database_errors() {
        assert!(decimal_from_db("abc", "quantity").is_err());
        assert!(timestamp_from_db("yesterday", "created_at").is_err());
    }
}
