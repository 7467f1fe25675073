//! One entry records a single inventory-loss event. Entries are immutable
//! after creation except for the synchronization flag, which the export
//! pipeline flips false→true exactly once.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// Upper bound on free-form notes.
pub const MAX_NOTES_LEN: usize = 500;

/// A recorded inventory-loss event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: i64,
    /// Product business code; need not exist in the catalog.
    pub product_code: String,
    /// Denormalized name snapshot taken at entry time.
    pub product_name: String,
    pub reason_id: String,
    pub quantity: Decimal,
    pub unit_cost: Decimal,
    pub notes: Option<String>,
    /// True once the entry has been durably written to an export file.
    pub is_synchronized: bool,
    pub created_at: DateTime<Utc>,
}

impl Entry {
    /// Monetary value of the loss this entry represents.
    pub fn loss_value(&self) -> Decimal {
        self.quantity * self.unit_cost
    }
}

/// Payload for persisting a new entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEntry {
    pub product_code: String,
    /// Snapshot name; the repository falls back to the placeholder name when
    /// absent.
    pub product_name: Option<String>,
    pub reason_id: String,
    pub quantity: Decimal,
    pub unit_cost: Decimal,
    pub notes: Option<String>,
    /// False for every form-originated entry. The import pipeline passes
    /// true: imported rows are terminal and never re-exported.
    pub synchronized: bool,
    /// Defaults to now when unset.
    pub created_at: Option<DateTime<Utc>>,
}

impl NewEntry {
    pub fn validate(&self) -> Result<()> {
        if self.product_code.trim().is_empty() {
            return Err(Error::validation("product code must not be empty"));
        }
        if self.reason_id.trim().is_empty() {
            return Err(Error::validation("reason id must not be empty"));
        }
        if self.quantity <= Decimal::ZERO {
            return Err(Error::validation(format!(
                "quantity must be positive, got {}",
                self.quantity
            )));
        }
        if self.unit_cost < Decimal::ZERO {
            return Err(Error::validation(format!(
                "unit cost must not be negative, got {}",
                self.unit_cost
            )));
        }
        if let Some(notes) = &self.notes {
            if notes.chars().count() > MAX_NOTES_LEN {
                return Err(Error::validation(format!(
                    "notes exceed {MAX_NOTES_LEN} characters"
                )));
            }
        }
        Ok(())
    }
}

/// Inclusive date range used by reporting queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant <= self.end
    }
}

/// Totals over a set of entries. Zero-valued when nothing matches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LossAggregate {
    pub total_value: Decimal,
    pub total_quantity: Decimal,
    pub entry_count: i64,
}

impl LossAggregate {
    pub fn accumulate(&mut self, entry: &Entry) {
        self.total_value += entry.loss_value();
        self.total_quantity += entry.quantity;
        self.entry_count += 1;
    }
}

/// Per-reason slice of the loss report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReasonLossBreakdown {
    pub reason_id: String,
    pub reason_code: String,
    pub reason_description: String,
    pub entry_count: i64,
    pub total_quantity: Decimal,
    pub total_value: Decimal,
}
