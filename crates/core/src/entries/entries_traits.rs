use async_trait::async_trait;

use crate::errors::Result;

use super::{DateRange, Entry, LossAggregate, NewEntry};

/// Repository contract for loss entries.
///
/// Reads hit the connection pool directly; mutations go through the
/// storage layer's single writer.
#[async_trait]
pub trait EntryRepositoryTrait: Send + Sync {
    /// Persist a new entry and return its assigned id.
    async fn insert(&self, new_entry: NewEntry) -> Result<i64>;

    /// Entries for `reason_id` that have not been externalized yet, oldest
    /// first (id ascending as tiebreak) so export output is reproducible.
    fn find_unsynchronized_by_reason(&self, reason_id: &str) -> Result<Vec<Entry>>;

    /// Flip the synchronization flag for the given ids. Idempotent; a no-op
    /// on an empty set; ids that no longer exist are skipped. Returns the
    /// number of matched rows.
    async fn mark_synchronized(&self, entry_ids: Vec<i64>) -> Result<usize>;

    /// Sum `quantity * unit_cost` and count entries, optionally bounded by
    /// an inclusive date range.
    fn aggregate_loss_value(&self, range: Option<&DateRange>) -> Result<LossAggregate>;

    /// Entries within the range (all entries when `None`), oldest first.
    fn find_in_range(&self, range: Option<&DateRange>) -> Result<Vec<Entry>>;

    /// Most recent entries, newest first.
    fn find_recent(&self, limit: i64) -> Result<Vec<Entry>>;
}
