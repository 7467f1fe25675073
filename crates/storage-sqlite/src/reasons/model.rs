//! Database model for the reasons table.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Queryable, Identifiable, Insertable, Selectable, Debug, Clone, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::reasons)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ReasonDB {
    pub id: String,
    pub code: String,
    pub description: String,
    pub is_active: i32,
    pub created_at: String,
    pub updated_at: String,
}
