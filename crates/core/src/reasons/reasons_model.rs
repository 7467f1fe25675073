//! Standardized loss categories. Seeded once at first run; read-mostly after.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reason assigned to entries created by the import pipeline, which carries
/// no reason field on the wire.
pub const DEFAULT_IMPORT_REASON_ID: &str = "1";

/// The standard loss catalog: (id, code, description).
pub const STANDARD_REASONS: [(&str, &str, &str); 8] = [
    ("1", "01", "Expired product"),
    ("2", "02", "Damaged product"),
    ("3", "03", "Inventory count error"),
    ("4", "04", "Theft"),
    ("5", "05", "Operational loss"),
    ("6", "06", "Discarded"),
    ("7", "07", "Internal transfer"),
    ("8", "08", "Other"),
];

/// A standardized loss category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reason {
    pub id: String,
    /// Short display code, e.g. "01". Also drives export file naming.
    pub code: String,
    pub description: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for seeding or registering a reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReason {
    pub id: String,
    pub code: String,
    pub description: String,
    pub is_active: bool,
}

/// The catalog inserted when the reasons table is empty.
pub fn standard_reasons() -> Vec<NewReason> {
    STANDARD_REASONS
        .iter()
        .map(|(id, code, description)| NewReason {
            id: (*id).to_string(),
            code: (*code).to_string(),
            description: (*description).to_string(),
            is_active: true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalog_includes_default_import_reason() {
        let reasons = standard_reasons();
        assert_eq!(reasons.len(), 8);
        assert!(reasons.iter().any(|r| r.id == DEFAULT_IMPORT_REASON_ID));
    }

    #[test]
    fn standard_codes_are_zero_padded_and_unique() {
        let reasons = standard_reasons();
        let mut codes: Vec<_> = reasons.iter().map(|r| r.code.clone()).collect();
        assert!(codes.iter().all(|c| c.len() == 2));
        codes.dedup();
        assert_eq!(codes.len(), 8);
    }
}
