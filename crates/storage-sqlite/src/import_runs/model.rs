//! Database model for the import_runs table.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Queryable, Identifiable, Insertable, Selectable, Debug, Clone, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::import_runs)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ImportRunDB {
    pub id: String,
    pub file_name: String,
    pub total_lines: i64,
    pub imported_lines: i64,
    pub failed_lines: i64,
    pub status: String,
    pub error_log: Option<String>,
    pub created_at: String,
}
