use crate::domain::{models::comment::Comment, ports::CommentRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteCommentRepo {
    pool: SqlitePool,
}

impl SqliteCommentRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for SqliteCommentRepo {
    async fn create(&self, comment: &Comment) -> Result<Comment, AppError> {
        sqlx::query_as::<_, Comment>(
            "INSERT INTO comments (id, event_id, parent_id, author_id, content, created_at) VALUES (?, ?, ?, ?, ?, ?) RETURNING *",
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
        sqlx::query_as::<_, Comment>("SELECT * FROM comments WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Comment>, AppError> {
        sqlx::query_as::<_, Comment>("SELECT * FROM comments WHERE event_id = ? ORDER BY created_at ASC")
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete_many(&self, event_id: &str, ids: &[String]) -> Result<u64, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let mut removed = 0;
        // Children first, so nothing is left to the cascade.
        for id in ids.iter().rev() {
            removed += sqlx::query("DELETE FROM comments WHERE id = ? AND event_id = ?")
                .bind(id)
                .bind(event_id)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?
                .rows_affected();
        }
        tx.commit().await.map_err(AppError::Database)?;
        Ok(removed)
    }
}
