use crate::domain::{models::participant::Participant, ports::ParticipantRepository};
use crate::error::AppError;
use crate::infra::repositories::sqlite_tx::{begin_immediate, finish};
use async_trait::async_trait;
use sqlx::{SqliteConnection, SqlitePool};

pub struct SqliteParticipantRepo {
    pool: SqlitePool,
}

impl SqliteParticipantRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn delete_locked(conn: &mut SqliteConnection, id: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM comments WHERE author_id = ?")
            .bind(id)
            .execute(&mut *conn)
            .await
            .map_err(AppError::Database)?;

        let result = sqlx::query("DELETE FROM participants WHERE id = ?")
            .bind(id)
            .execute(&mut *conn)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Participant"));
        }
        Ok(())
    }
}

#[async_trait]
impl ParticipantRepository for SqliteParticipantRepo {
    async fn find_by_id(&self, id: &str) -> Result<Option<Participant>, AppError> {
        sqlx::query_as::<_, Participant>("SELECT * FROM participants WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Participant>, AppError> {
        sqlx::query_as::<_, Participant>("SELECT * FROM participants WHERE event_id = ? ORDER BY created_at ASC")
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let mut tx = begin_immediate(&self.pool).await?;
        let result = Self::delete_locked(&mut *tx, id).await;
        finish(tx, result).await
    }
}
