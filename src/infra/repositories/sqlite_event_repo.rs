use crate::domain::{
    models::{event::{Event, EventPatch}, participant::Participant},
    ports::EventRepository,
};
use crate::error::AppError;
use crate::infra::repositories::sqlite_tx::{begin_immediate, finish};
use async_trait::async_trait;
use sqlx::{Row, SqliteConnection, SqlitePool};

pub struct SqliteEventRepo {
    pool: SqlitePool,
}

impl SqliteEventRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn update_locked(conn: &mut SqliteConnection, edit_id: &str, patch: &EventPatch) -> Result<Event, AppError> {
        let current = sqlx::query_as::<_, Event>("SELECT * FROM events WHERE edit_id = ?")
            .bind(edit_id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::not_found("Event"))?;

        let count: i64 = sqlx::query("SELECT COUNT(*) AS count FROM participants WHERE event_id = ?")
            .bind(&current.id)
            .fetch_one(&mut *conn)
            .await
            .map_err(AppError::Database)?
            .get("count");

        let merged = current.apply_patch(patch, count)?;

        sqlx::query_as::<_, Event>(
            r#"UPDATE events SET
                name=?, location=?, start_time=?, end_time=?,
                organizer_email=?, organizer_name=?, description=?,
                link=?, image_url=?, capacity=?
               WHERE id=? RETURNING *"#
        )
            .bind(&merged.name)
            .bind(&merged.location)
            .bind(merged.start_time)
            .bind(merged.end_time)
            .bind(&merged.organizer_email)
            .bind(&merged.organizer_name)
            .bind(&merged.description)
            .bind(&merged.link)
            .bind(&merged.image_url)
            .bind(merged.capacity)
            .bind(&merged.id)
            .fetch_one(&mut *conn)
            .await
            .map_err(AppError::Database)
    }

    async fn delete_locked(conn: &mut SqliteConnection, edit_id: &str) -> Result<(Event, Vec<Participant>), AppError> {
        let event = sqlx::query_as::<_, Event>("SELECT * FROM events WHERE edit_id = ?")
            .bind(edit_id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::not_found("Event"))?;

        let participants = sqlx::query_as::<_, Participant>(
            "SELECT * FROM participants WHERE event_id = ? ORDER BY created_at ASC",
        )
            .bind(&event.id)
            .fetch_all(&mut *conn)
            .await
            .map_err(AppError::Database)?;

        for table in ["comments", "participants", "invitations"] {
            sqlx::query(&format!("DELETE FROM {} WHERE event_id = ?", table))
                .bind(&event.id)
                .execute(&mut *conn)
                .await
                .map_err(AppError::Database)?;
        }

        sqlx::query("DELETE FROM events WHERE id = ?")
            .bind(&event.id)
            .execute(&mut *conn)
            .await
            .map_err(AppError::Database)?;

        Ok((event, participants))
    }
}

#[async_trait]
impl EventRepository for SqliteEventRepo {
    async fn create(&self, event: &Event) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            r#"INSERT INTO events (
                id, edit_id, name, location, start_time, end_time,
                organizer_email, organizer_name, description, link, image_url, capacity, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *"#
        )
            .bind(&event.id)
            .bind(&event.edit_id)
            .bind(&event.name)
            .bind(&event.location)
            .bind(event.start_time)
            .bind(event.end_time)
            .bind(&event.organizer_email)
            .bind(&event.organizer_name)
            .bind(&event.description)
            .bind(&event.link)
            .bind(&event.image_url)
            .bind(event.capacity)
            .bind(event.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update_checked(&self, edit_id: &str, patch: &EventPatch) -> Result<Event, AppError> {
        let mut tx = begin_immediate(&self.pool).await?;
        let result = Self::update_locked(&mut *tx, edit_id, patch).await;
        finish(tx, result).await
    }

    async fn delete_cascade(&self, edit_id: &str) -> Result<(Event, Vec<Participant>), AppError> {
        let mut tx = begin_immediate(&self.pool).await?;
        let result = Self::delete_locked(&mut *tx, edit_id).await;
        finish(tx, result).await
    }
}
