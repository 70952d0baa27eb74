use crate::domain::{models::job::{Job, CLAIM_LEASE_SECS, MAX_ATTEMPTS}, ports::JobRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;
use chrono::{DateTime, Duration, Utc};

pub struct PostgresJobRepo {
    pool: PgPool,
}

impl PostgresJobRepo {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

#[async_trait]
impl JobRepository for PostgresJobRepo {
    async fn create(&self, job: &Job) -> Result<Job, AppError> {
        sqlx::query_as::<_, Job>(
            "INSERT INTO jobs (id, job_type, payload, execute_at, status, attempts, error_message, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *"
        )
            .bind(&job.id)
            .bind(&job.job_type)
            .bind(&job.payload)
            .bind(job.execute_at)
            .bind(&job.status)
            .bind(job.attempts)
            .bind(&job.error_message)
            .bind(job.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_pending(&self, limit: i32) -> Result<Vec<Job>, AppError> {
        let now = Utc::now();
        let lease_until = now + Duration::seconds(CLAIM_LEASE_SECS);

        sqlx::query(
            "UPDATE jobs SET status = 'FAILED', error_message = 'Worker stopped while processing' WHERE status = 'PROCESSING' AND execute_at <= $1 AND attempts >= $2"
        )
            .bind(now)
            .bind(MAX_ATTEMPTS)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        sqlx::query_as::<_, Job>(
            r#"
            UPDATE jobs
            SET status = 'PROCESSING', attempts = attempts + 1, execute_at = $1
            WHERE id IN (
                SELECT id
                FROM jobs
                WHERE status IN ('PENDING', 'PROCESSING') AND execute_at <= $2
                ORDER BY execute_at ASC
                LIMIT $3
                FOR UPDATE SKIP LOCKED
            )
            RETURNING *
            "#
        )
            .bind(lease_until)
            .bind(now)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update_status(&self, id: &str, status: &str, error_message: Option<String>) -> Result<(), AppError> {
        sqlx::query("UPDATE jobs SET status = $1, error_message = $2 WHERE id = $3")
            .bind(status)
            .bind(error_message)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }

    async fn schedule_retry(&self, id: &str, execute_at: DateTime<Utc>, error_message: String) -> Result<(), AppError> {
        sqlx::query("UPDATE jobs SET status = 'PENDING', execute_at = $1, error_message = $2 WHERE id = $3")
            .bind(execute_at)
            .bind(error_message)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }
}
