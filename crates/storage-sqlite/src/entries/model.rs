//! Database models for the entries table.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Queryable, Identifiable, Selectable, Debug, Clone, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::entries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct EntryDB {
    pub id: i64,
    pub product_code: String,
    pub product_name: String,
    pub reason_id: String,
    pub quantity: String,
    pub unit_cost: String,
    pub notes: Option<String>,
    pub is_synchronized: i32,
    pub created_at: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::entries)]
pub struct NewEntryDB {
    pub product_code: String,
    pub product_name: String,
    pub reason_id: String,
    pub quantity: String,
    pub unit_cost: String,
    pub notes: Option<String>,
    pub is_synchronized: i32,
    pub created_at: String,
}
