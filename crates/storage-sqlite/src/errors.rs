//! Storage-level errors and their conversion into the core taxonomy.

use diesel::result::Error as DieselError;
use thiserror::Error;

use lossbook_core::errors::{DatabaseError, Error as CoreError};

/// Failures raised inside the SQLite backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Query failed: {0}")]
    QueryFailed(#[from] DieselError),

    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),
}

impl From<StorageError> for CoreError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::QueryFailed(DieselError::NotFound) => {
                CoreError::NotFound("record not found".to_string())
            }
            StorageError::QueryFailed(inner) => {
                CoreError::Database(DatabaseError::QueryFailed(inner.to_string()))
            }
            StorageError::Pool(inner) => {
                CoreError::Database(DatabaseError::ConnectionFailed(inner.to_string()))
            }
        }
    }
}
