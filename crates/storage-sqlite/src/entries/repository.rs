use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;

use lossbook_core::entries::{
    DateRange, Entry, EntryRepositoryTrait, LossAggregate, NewEntry,
};
use lossbook_core::errors::Result;
use lossbook_core::products::UNREGISTERED_PRODUCT_NAME;

use crate::convert::{decimal_from_db, decimal_to_db, timestamp_from_db, timestamp_to_db};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::entries;

use super::model::{EntryDB, NewEntryDB};

fn to_entry(row: EntryDB) -> Result<Entry> {
    Ok(Entry {
        id: row.id,
        product_code: row.product_code,
        product_name: row.product_name,
        reason_id: row.reason_id,
        quantity: decimal_from_db(&row.quantity, "entries.quantity")?,
        unit_cost: decimal_from_db(&row.unit_cost, "entries.unit_cost")?,
        notes: row.notes,
        is_synchronized: row.is_synchronized != 0,
        created_at: timestamp_from_db(&row.created_at, "entries.created_at")?,
    })
}

pub struct EntryRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl EntryRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl EntryRepositoryTrait for EntryRepository {
    async fn insert(&self, new_entry: NewEntry) -> Result<i64> {
        new_entry.validate()?;
        self.writer
            .exec(move |conn| {
                let row = NewEntryDB {
                    product_code: new_entry.product_code,
                    product_name: new_entry
                        .product_name
                        .unwrap_or_else(|| UNREGISTERED_PRODUCT_NAME.to_string()),
                    reason_id: new_entry.reason_id,
                    quantity: decimal_to_db(new_entry.quantity),
                    unit_cost: decimal_to_db(new_entry.unit_cost),
                    notes: new_entry.notes,
                    is_synchronized: i32::from(new_entry.synchronized),
                    created_at: timestamp_to_db(new_entry.created_at.unwrap_or_else(Utc::now)),
                };
                let id = diesel::insert_into(entries::table)
                    .values(&row)
                    .returning(entries::id)
                    .get_result::<i64>(conn)
                    .map_err(StorageError::from)?;
                Ok(id)
            })
            .await
    }

    fn find_unsynchronized_by_reason(&self, reason_id: &str) -> Result<Vec<Entry>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = entries::table
            .filter(entries::reason_id.eq(reason_id))
            .filter(entries::is_synchronized.eq(0))
            .order((entries::created_at.asc(), entries::id.asc()))
            .select(EntryDB::as_select())
            .load::<EntryDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter().map(to_entry).collect()
    }

    async fn mark_synchronized(&self, entry_ids: Vec<i64>) -> Result<usize> {
        if entry_ids.is_empty() {
            return Ok(0);
        }
        self.writer
            .exec(move |conn| {
                let affected =
                    diesel::update(entries::table.filter(entries::id.eq_any(entry_ids)))
                        .set(entries::is_synchronized.eq(1))
                        .execute(conn)
                        .map_err(StorageError::from)?;
                Ok(affected)
            })
            .await
    }

    fn aggregate_loss_value(&self, range: Option<&DateRange>) -> Result<LossAggregate> {
        let mut aggregate = LossAggregate::default();
        for entry in self.find_in_range(range)? {
            aggregate.accumulate(&entry);
        }
        Ok(aggregate)
    }

    fn find_in_range(&self, range: Option<&DateRange>) -> Result<Vec<Entry>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = entries::table
            .select(EntryDB::as_select())
            .into_boxed();
        if let Some(range) = range {
            query = query
                .filter(entries::created_at.ge(timestamp_to_db(range.start)))
                .filter(entries::created_at.le(timestamp_to_db(range.end)));
        }
        let rows = query
            .order((entries::created_at.asc(), entries::id.asc()))
            .load::<EntryDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter().map(to_entry).collect()
    }

    fn find_recent(&self, limit: i64) -> Result<Vec<Entry>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = entries::table
            .order((entries::created_at.desc(), entries::id.desc()))
            .limit(limit)
            .select(EntryDB::as_select())
            .load::<EntryDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter().map(to_entry).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    use crate::db::{create_pool, init, run_migrations, write_actor::spawn_writer};
    use crate::reasons::ReasonRepository;
    use lossbook_core::reasons::{standard_reasons, ReasonRepositoryTrait};

    async fn setup_repo() -> EntryRepository {
        let app_data = tempdir()
            .expect("tempdir")
            .keep()
            .to_string_lossy()
            .to_string();
        let db_path = init(&app_data).expect("init db");
        run_migrations(&db_path).expect("migrate db");
        let pool = create_pool(&db_path).expect("create pool");
        let writer = spawn_writer(pool.as_ref().clone());

        // Seed the catalog so entry FK references resolve.
        let reason_repo = ReasonRepository::new(pool.clone(), writer.clone());
        reason_repo
            .ensure_seeded(standard_reasons())
            .await
            .expect("seed reasons");

        EntryRepository::new(pool, writer)
    }

    fn new_entry(reason: &str, code: &str) -> NewEntry {
        NewEntry {
            product_code: code.to_string(),
            product_name: Some(format!("Product {code}")),
            reason_id: reason.to_string(),
            quantity: dec!(2),
            unit_cost: dec!(1.50),
            notes: None,
            synchronized: false,
            created_at: None,
        }
    }

    #[tokio::test]
    async fn insert_assigns_increasing_ids() {
        let repo = setup_repo().await;
        let first = repo.insert(new_entry("1", "a")).await.expect("insert");
        let second = repo.insert(new_entry("1", "b")).await.expect("insert");
        assert!(second > first);
    }

    #[tokio::test]
    async fn pending_query_orders_by_creation_time() {
        let repo = setup_repo().await;
        let base = Utc.with_ymd_and_hms(2026, 8, 1, 9, 0, 0).unwrap();

        let mut late = new_entry("1", "late");
        late.created_at = Some(base + Duration::hours(2));
        let mut early = new_entry("1", "early");
        early.created_at = Some(base);

        repo.insert(late).await.expect("insert");
        repo.insert(early).await.expect("insert");

        let pending = repo.find_unsynchronized_by_reason("1").expect("query");
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].product_code, "early");
        assert_eq!(pending[1].product_code, "late");
    }

    #[tokio::test]
    async fn pending_query_excludes_synchronized_and_other_reasons() {
        let repo = setup_repo().await;
        let kept = repo.insert(new_entry("1", "kept")).await.expect("insert");
        repo.insert(new_entry("2", "other")).await.expect("insert");

        repo.mark_synchronized(vec![kept]).await.expect("mark");

        assert!(repo.find_unsynchronized_by_reason("1").expect("query").is_empty());
        assert_eq!(repo.find_unsynchronized_by_reason("2").expect("query").len(), 1);
    }

    #[tokio::test]
    async fn mark_synchronized_is_idempotent_and_tolerates_missing_ids() {
        let repo = setup_repo().await;
        let id = repo.insert(new_entry("1", "a")).await.expect("insert");

        assert_eq!(repo.mark_synchronized(vec![]).await.expect("empty"), 0);
        assert_eq!(
            repo.mark_synchronized(vec![id, 424242]).await.expect("mark"),
            1
        );
        assert_eq!(repo.mark_synchronized(vec![id]).await.expect("again"), 1);
    }

    #[tokio::test]
    async fn insert_with_unknown_reason_is_a_persistence_error() {
        let repo = setup_repo().await;
        let result = repo.insert(new_entry("no-such-reason", "a")).await;
        assert!(matches!(
            result,
            Err(lossbook_core::Error::Database(_))
        ));
    }

    #[tokio::test]
    async fn aggregates_are_zero_when_nothing_matches() {
        let repo = setup_repo().await;
        let aggregate = repo.aggregate_loss_value(None).expect("aggregate");
        assert_eq!(aggregate, LossAggregate::default());
    }

    #[tokio::test]
    async fn aggregates_respect_the_date_range() {
        let repo = setup_repo().await;
        let base = Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap();

        let mut inside = new_entry("1", "inside");
        inside.created_at = Some(base);
        let mut outside = new_entry("1", "outside");
        outside.created_at = Some(base + Duration::days(10));

        repo.insert(inside).await.expect("insert");
        repo.insert(outside).await.expect("insert");

        let range = DateRange {
            start: base - Duration::days(1),
            end: base + Duration::days(1),
        };
        let aggregate = repo.aggregate_loss_value(Some(&range)).expect("aggregate");
        assert_eq!(aggregate.entry_count, 1);
        assert_eq!(aggregate.total_quantity, dec!(2));
        assert_eq!(aggregate.total_value, dec!(3.00));
    }

    #[tokio::test]
    async fn decimals_survive_the_round_trip() {
        let repo = setup_repo().await;
        let mut entry = new_entry("1", "a");
        entry.quantity = dec!(1.25);
        entry.unit_cost = dec!(0.99);
        repo.insert(entry).await.expect("insert");

        let pending = repo.find_unsynchronized_by_reason("1").expect("query");
        assert_eq!(pending[0].quantity, dec!(1.25));
        assert_eq!(pending[0].unit_cost, dec!(0.99));
    }

    #[tokio::test]
    async fn recent_entries_come_newest_first() {
        let repo = setup_repo().await;
        let base = Utc.with_ymd_and_hms(2026, 8, 1, 9, 0, 0).unwrap();
        for (code, offset) in [("old", 0), ("new", 5)] {
            let mut entry = new_entry("1", code);
            entry.created_at = Some(base + Duration::minutes(offset));
            repo.insert(entry).await.expect("insert");
        }

        let recent = repo.find_recent(1).expect("query");
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].product_code, "new");
    }
}
