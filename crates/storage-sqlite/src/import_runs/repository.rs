use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use lossbook_core::errors::Result;
use lossbook_core::import::{ImportRun, ImportRunRepositoryTrait, NewImportRun};

use crate::convert::{enum_from_db, enum_to_db, timestamp_from_db, timestamp_to_db};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::import_runs;

use super::model::ImportRunDB;

fn to_import_run(row: ImportRunDB) -> Result<ImportRun> {
    Ok(ImportRun {
        id: row.id,
        file_name: row.file_name,
        total_lines: row.total_lines,
        imported_lines: row.imported_lines,
        failed_lines: row.failed_lines,
        status: enum_from_db(&row.status)?,
        error_log: row.error_log,
        created_at: timestamp_from_db(&row.created_at, "import_runs.created_at")?,
    })
}

pub struct ImportRunRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl ImportRunRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl ImportRunRepositoryTrait for ImportRunRepository {
    async fn record(&self, run: NewImportRun) -> Result<ImportRun> {
        self.writer
            .exec(move |conn| {
                let row = ImportRunDB {
                    id: Uuid::now_v7().to_string(),
                    file_name: run.file_name,
                    total_lines: run.total_lines,
                    imported_lines: run.imported_lines,
                    failed_lines: run.failed_lines,
                    status: enum_to_db(&run.status)?,
                    error_log: run.error_log,
                    created_at: timestamp_to_db(Utc::now()),
                };
                let stored = diesel::insert_into(import_runs::table)
                    .values(&row)
                    .returning(ImportRunDB::as_returning())
                    .get_result::<ImportRunDB>(conn)
                    .map_err(StorageError::from)?;
                to_import_run(stored)
            })
            .await
    }

    fn list_recent(&self, limit: i64) -> Result<Vec<ImportRun>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = import_runs::table
            .order(import_runs::created_at.desc())
            .limit(limit)
            .select(ImportRunDB::as_select())
            .load::<ImportRunDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter().map(to_import_run).collect()
    }
}
