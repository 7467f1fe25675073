//! Form-path service over the entry repository: validates payloads, takes the
//! product-name snapshot, and builds loss reports.

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use crate::products::{ProductRepositoryTrait, UNREGISTERED_PRODUCT_NAME};
use crate::reasons::ReasonRepositoryTrait;

use super::{
    DateRange, Entry, EntryRepositoryTrait, LossAggregate, NewEntry, ReasonLossBreakdown,
};

/// Validated entry-creation request produced by the entry form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryDraft {
    pub product_code: String,
    pub reason_id: String,
    pub quantity: Decimal,
    pub unit_cost: Decimal,
    pub notes: Option<String>,
}

pub struct EntryService {
    entry_repository: Arc<dyn EntryRepositoryTrait>,
    product_repository: Arc<dyn ProductRepositoryTrait>,
    reason_repository: Arc<dyn ReasonRepositoryTrait>,
}

impl EntryService {
    pub fn new(
        entry_repository: Arc<dyn EntryRepositoryTrait>,
        product_repository: Arc<dyn ProductRepositoryTrait>,
        reason_repository: Arc<dyn ReasonRepositoryTrait>,
    ) -> Self {
        Self {
            entry_repository,
            product_repository,
            reason_repository,
        }
    }

    /// Record a loss entry from the form. The product need not exist in the
    /// catalog; unknown codes get the placeholder name snapshot. Always
    /// persists unsynchronized.
    pub async fn add_entry(&self, draft: EntryDraft) -> Result<i64> {
        if self.reason_repository.find_by_id(&draft.reason_id)?.is_none() {
            return Err(Error::not_found(format!(
                "reason {} is not registered",
                draft.reason_id
            )));
        }

        let product_name = match self.product_repository.find_by_code(&draft.product_code)? {
            Some(product) => product.name,
            None => {
                debug!(
                    "product {} not in catalog, recording as unregistered",
                    draft.product_code
                );
                UNREGISTERED_PRODUCT_NAME.to_string()
            }
        };

        let new_entry = NewEntry {
            product_code: draft.product_code,
            product_name: Some(product_name),
            reason_id: draft.reason_id,
            quantity: draft.quantity,
            unit_cost: draft.unit_cost,
            notes: draft.notes,
            synchronized: false,
            created_at: None,
        };
        new_entry.validate()?;

        self.entry_repository.insert(new_entry).await
    }

    pub fn recent_entries(&self, limit: i64) -> Result<Vec<Entry>> {
        self.entry_repository.find_recent(limit)
    }

    /// Overall loss totals, optionally bounded by a date range.
    pub fn loss_summary(&self, range: Option<&DateRange>) -> Result<LossAggregate> {
        self.entry_repository.aggregate_loss_value(range)
    }

    /// Loss totals grouped by reason, highest value first. Reasons with no
    /// entries in the range are omitted.
    pub fn loss_by_reason(&self, range: Option<&DateRange>) -> Result<Vec<ReasonLossBreakdown>> {
        let reasons = self.reason_repository.list_active()?;
        let entries = self.entry_repository.find_in_range(range)?;

        let mut per_reason: HashMap<&str, LossAggregate> = HashMap::new();
        for entry in &entries {
            per_reason
                .entry(entry.reason_id.as_str())
                .or_default()
                .accumulate(entry);
        }

        let mut breakdown: Vec<ReasonLossBreakdown> = reasons
            .iter()
            .filter_map(|reason| {
                per_reason.get(reason.id.as_str()).map(|totals| {
                    ReasonLossBreakdown {
                        reason_id: reason.id.clone(),
                        reason_code: reason.code.clone(),
                        reason_description: reason.description.clone(),
                        entry_count: totals.entry_count,
                        total_quantity: totals.total_quantity,
                        total_value: totals.total_value,
                    }
                })
            })
            .collect();
        breakdown.sort_by(|a, b| b.total_value.cmp(&a.total_value));

        Ok(breakdown)
    }
}
