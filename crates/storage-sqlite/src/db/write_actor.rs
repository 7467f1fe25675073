//! Single-writer actor.
//!
//! SQLite allows one writer at a time; instead of letting pool connections
//! race for the write lock, every mutation is submitted to one dedicated OS
//! thread. Each job runs inside an IMMEDIATE transaction, so a failed job
//! rolls back completely.

use std::sync::mpsc;
use std::thread;

use diesel::sqlite::SqliteConnection;
use diesel::Connection;
use log::{debug, warn};
use tokio::sync::oneshot;

use lossbook_core::errors::{DatabaseError, Error, Result};

use crate::db::DbPool;
use crate::errors::StorageError;

type WriteJob = Box<dyn FnOnce(&DbPool) + Send + 'static>;

/// Cheap handle for submitting write jobs to the writer thread.
#[derive(Clone)]
pub struct WriteHandle {
    sender: mpsc::Sender<WriteJob>,
}

/// Spawn the writer thread. The thread exits when every handle is dropped.
pub fn spawn_writer(pool: DbPool) -> WriteHandle {
    let (sender, receiver) = mpsc::channel::<WriteJob>();
    thread::Builder::new()
        .name("lossbook-sqlite-writer".to_string())
        .spawn(move || {
            while let Ok(job) = receiver.recv() {
                job(&pool);
            }
            debug!("writer channel closed, shutting down");
        })
        .expect("failed to spawn sqlite writer thread");
    WriteHandle { sender }
}

// Bridges domain errors through diesel's transaction error bound.
enum TxError {
    Domain(Error),
    Diesel(diesel::result::Error),
}

impl From<diesel::result::Error> for TxError {
    fn from(err: diesel::result::Error) -> Self {
        TxError::Diesel(err)
    }
}

impl WriteHandle {
    /// Run `job` on the writer thread inside an IMMEDIATE transaction and
    /// await its result. An error return rolls the transaction back.
    pub async fn exec<T, F>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let (done_tx, done_rx) = oneshot::channel::<Result<T>>();
        let boxed: WriteJob = Box::new(move |pool| {
            let outcome = run_in_transaction(pool, job);
            if done_tx.send(outcome).is_err() {
                warn!("write job finished but the caller went away");
            }
        });
        self.sender.send(boxed).map_err(|_| {
            Error::Database(DatabaseError::Internal(
                "sqlite writer is not running".to_string(),
            ))
        })?;
        done_rx.await.map_err(|_| {
            Error::Database(DatabaseError::Internal(
                "sqlite writer dropped the job".to_string(),
            ))
        })?
    }
}

fn run_in_transaction<T, F>(pool: &DbPool, job: F) -> Result<T>
where
    F: FnOnce(&mut SqliteConnection) -> Result<T>,
{
    let mut conn = pool.get().map_err(StorageError::from)?;
    conn.immediate_transaction::<T, TxError, _>(|tx| job(tx).map_err(TxError::Domain))
        .map_err(|err| match err {
            TxError::Domain(domain) => domain,
            TxError::Diesel(diesel_err) => StorageError::from(diesel_err).into(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::prelude::*;

    use crate::db::{create_pool, get_connection, init, run_migrations};
    use crate::schema::reasons;

    fn setup_pool() -> std::sync::Arc<DbPool> {
        let app_data = tempfile::tempdir()
            .expect("tempdir")
            .keep()
            .to_string_lossy()
            .to_string();
        let db_path = init(&app_data).expect("init db");
        run_migrations(&db_path).expect("migrate db");
        create_pool(&db_path).expect("create pool")
    }

    fn insert_reason(conn: &mut SqliteConnection, id: &str) -> Result<()> {
        diesel::insert_into(reasons::table)
            .values((
                reasons::id.eq(id),
                reasons::code.eq(id),
                reasons::description.eq("test"),
                reasons::is_active.eq(1),
                reasons::created_at.eq("2026-08-07T00:00:00+00:00"),
                reasons::updated_at.eq("2026-08-07T00:00:00+00:00"),
            ))
            .execute(conn)
            .map_err(StorageError::from)?;
        Ok(())
    }

    fn count_reasons(pool: &std::sync::Arc<DbPool>) -> i64 {
        let mut conn = get_connection(pool).expect("conn");
        reasons::table
            .count()
            .get_result(&mut conn)
            .expect("count")
    }

    #[tokio::test]
    async fn committed_jobs_are_visible_to_readers() {
        let pool = setup_pool();
        let writer = spawn_writer(pool.as_ref().clone());

        writer
            .exec(|conn| insert_reason(conn, "90"))
            .await
            .expect("insert");

        assert_eq!(count_reasons(&pool), 1);
    }

    #[tokio::test]
    async fn failed_jobs_roll_back_completely() {
        let pool = setup_pool();
        let writer = spawn_writer(pool.as_ref().clone());

        let result = writer
            .exec(|conn| {
                insert_reason(conn, "91")?;
                // Duplicate primary key fails the job after the first insert.
                insert_reason(conn, "91")
            })
            .await;

        assert!(result.is_err(), "expected duplicate key failure");
        assert_eq!(count_reasons(&pool), 0, "first insert should roll back");
    }

    #[tokio::test]
    async fn handles_a_stream_of_jobs_from_one_handle() {
        let pool = setup_pool();
        let writer = spawn_writer(pool.as_ref().clone());

        for id in ["1", "2", "3"] {
            writer
                .exec(move |conn| insert_reason(conn, id))
                .await
                .expect("insert");
        }

        let mut conn = get_connection(&pool).expect("conn");
        let ids: Vec<String> = reasons::table
            .select(reasons::id)
            .order(reasons::id.asc())
            .load(&mut conn)
            .expect("load");
        assert_eq!(ids, vec!["1", "2", "3"]);
    }
}
