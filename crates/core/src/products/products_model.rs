//! Catalog products. Created and updated by catalog sync; the pipelines only
//! look them up by code (and create placeholders on import).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Name snapshot recorded on entries whose product code is not in the catalog.
pub const UNREGISTERED_PRODUCT_NAME: &str = "UNREGISTERED PRODUCT";

/// How a product is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitType {
    /// Sold by weight (kilograms).
    #[serde(rename = "KG")]
    Weight,
    /// Sold by unit count.
    #[serde(rename = "UN")]
    Count,
}

impl UnitType {
    pub fn as_db_str(&self) -> &'static str {
        match self {
            UnitType::Weight => "KG",
            UnitType::Count => "UN",
        }
    }

    pub fn from_db_str(value: &str) -> Option<Self> {
        match value {
            "KG" => Some(UnitType::Weight),
            "UN" => Some(UnitType::Count),
            _ => None,
        }
    }
}

/// A catalog product, keyed by its business code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub code: String,
    pub name: String,
    pub unit_type: UnitType,
    pub regular_price: Decimal,
    pub club_price: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker; deleted products are invisible to lookups.
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Payload for creating or updating a product by code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub code: String,
    pub name: String,
    pub unit_type: UnitType,
    pub regular_price: Decimal,
    pub club_price: Option<Decimal>,
}

impl NewProduct {
    /// Minimal product created when an import line references an unknown code.
    pub fn placeholder(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            unit_type: UnitType::Count,
            regular_price: Decimal::ZERO,
            club_price: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_type_round_trips_through_db_strings() {
        for unit in [UnitType::Weight, UnitType::Count] {
            assert_eq!(UnitType::from_db_str(unit.as_db_str()), Some(unit));
        }
        assert_eq!(UnitType::from_db_str("CX"), None);
    }

    #[test]
    fn placeholder_products_are_count_based_and_free() {
        let product = NewProduct::placeholder("123", "Mystery item");
        assert_eq!(product.unit_type, UnitType::Count);
        assert_eq!(product.regular_price, Decimal::ZERO);
        assert!(product.club_price.is_none());
    }
}
