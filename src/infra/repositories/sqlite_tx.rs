use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::error::AppError;

/// Opens a write transaction up front so the read half of a
/// check-then-write sequence cannot interleave with another writer.
/// `busy_timeout` on the pool makes competing callers queue behind it.
/// A transaction dropped before `finish` is rolled back by sqlx.
pub async fn begin_immediate(pool: &SqlitePool) -> Result<Transaction<'static, Sqlite>, AppError> {
    pool.begin_with("BEGIN IMMEDIATE").await.map_err(AppError::Database)
}

/// Commits when `result` is `Ok`, rolls back otherwise, and returns it.
pub async fn finish<T>(tx: Transaction<'static, Sqlite>, result: Result<T, AppError>) -> Result<T, AppError> {
    match result {
        Ok(value) => {
            tx.commit().await.map_err(AppError::Database)?;
            Ok(value)
        }
        Err(e) => {
            tx.rollback().await.map_err(AppError::Database)?;
            Err(e)
        }
    }
}
