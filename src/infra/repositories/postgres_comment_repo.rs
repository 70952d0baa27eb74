use crate::domain::{models::comment::Comment, ports::CommentRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresCommentRepo {
    pool: PgPool,
}

impl PostgresCommentRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepo {
    async fn create(&self, comment: &Comment) -> Result<Comment, AppError> {
        sqlx::query_as::<_, Comment>(
            "INSERT INTO comments (id, event_id, parent_id, author_id, content, created_at) VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
            .bind(&comment.id)
            .bind(&comment.event_id)
            .bind(&comment.parent_id)
            .bind(&comment.author_id)
            .bind(&comment.content)
            .bind(comment.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::Database(e).constraint_as_validation("Author or parent comment no longer exists"))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Comment>, AppError> {
        sqlx::query_as::<_, Comment>("SELECT * FROM comments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Comment>, AppError> {
        sqlx::query_as::<_, Comment>("SELECT * FROM comments WHERE event_id = $1 ORDER BY created_at ASC")
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete_many(&self, event_id: &str, ids: &[String]) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM comments WHERE event_id = $1 AND id = ANY($2)")
            .bind(event_id)
            .bind(ids)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(result.rows_affected())
    }
}
