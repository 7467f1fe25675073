use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use log::info;

use lossbook_core::errors::Result;
use lossbook_core::reasons::{NewReason, Reason, ReasonRepositoryTrait};

use crate::convert::{timestamp_from_db, timestamp_to_db};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::reasons;

use super::model::ReasonDB;

fn to_reason(row: ReasonDB) -> Result<Reason> {
    Ok(Reason {
        id: row.id,
        code: row.code,
        description: row.description,
        is_active: row.is_active != 0,
        created_at: timestamp_from_db(&row.created_at, "reasons.created_at")?,
        updated_at: timestamp_from_db(&row.updated_at, "reasons.updated_at")?,
    })
}

pub struct ReasonRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl ReasonRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl ReasonRepositoryTrait for ReasonRepository {
    fn list_active(&self) -> Result<Vec<Reason>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = reasons::table
            .filter(reasons::is_active.eq(1))
            .order(reasons::code.asc())
            .select(ReasonDB::as_select())
            .load::<ReasonDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter().map(to_reason).collect()
    }

    fn find_by_id(&self, reason_id: &str) -> Result<Option<Reason>> {
        let mut conn = get_connection(&self.pool)?;
        let row = reasons::table
            .find(reason_id)
            .select(ReasonDB::as_select())
            .first::<ReasonDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        row.map(to_reason).transpose()
    }

    async fn ensure_seeded(&self, seed: Vec<NewReason>) -> Result<usize> {
        self.writer
            .exec(move |conn| {
                let existing: i64 = reasons::table
                    .count()
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                if existing > 0 {
                    return Ok(0);
                }

                let now = timestamp_to_db(Utc::now());
                let rows: Vec<ReasonDB> = seed
                    .into_iter()
                    .map(|reason| ReasonDB {
                        id: reason.id,
                        code: reason.code,
                        description: reason.description,
                        is_active: i32::from(reason.is_active),
                        created_at: now.clone(),
                        updated_at: now.clone(),
                    })
                    .collect();

                let inserted = diesel::insert_into(reasons::table)
                    .values(&rows)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                info!("seeded {inserted} loss reasons");
                Ok(inserted)
            })
            .await
    }
}
