use crate::domain::{models::participant::Participant, ports::ParticipantRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresParticipantRepo {
    pool: PgPool,
}

impl PostgresParticipantRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ParticipantRepository for PostgresParticipantRepo {
    async fn find_by_id(&self, id: &str) -> Result<Option<Participant>, AppError> {
        sqlx::query_as::<_, Participant>("SELECT * FROM participants WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Participant>, AppError> {
        sqlx::query_as::<_, Participant>("SELECT * FROM participants WHERE event_id = $1 ORDER BY created_at ASC")
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        sqlx::query("DELETE FROM comments WHERE author_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        let result = sqlx::query("DELETE FROM participants WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Participant"));
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }
}
