use crate::domain::{
    models::{event::{Event, EventPatch}, participant::Participant},
    ports::EventRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{PgPool, Row};

pub struct PostgresEventRepo {
    pool: PgPool,
}

impl PostgresEventRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for PostgresEventRepo {
    async fn create(&self, event: &Event) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            r#"INSERT INTO events (
                id, edit_id, name, location, start_time, end_time,
                organizer_email, organizer_name, description, link, image_url, capacity, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
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
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update_checked(&self, edit_id: &str, patch: &EventPatch) -> Result<Event, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // Row lock serializes against redemptions, which lock the same row.
        let current = sqlx::query_as::<_, Event>("SELECT * FROM events WHERE edit_id = $1 FOR UPDATE")
            .bind(edit_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::not_found("Event"))?;

        let count: i64 = sqlx::query("SELECT COUNT(*) AS count FROM participants WHERE event_id = $1")
            .bind(&current.id)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?
            .get("count");

        let merged = current.apply_patch(patch, count)?;

        let updated = sqlx::query_as::<_, Event>(
            r#"UPDATE events SET
                name=$1, location=$2, start_time=$3, end_time=$4,
                organizer_email=$5, organizer_name=$6, description=$7,
                link=$8, image_url=$9, capacity=$10
               WHERE id=$11 RETURNING *"#
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
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(updated)
    }

    async fn delete_cascade(&self, edit_id: &str) -> Result<(Event, Vec<Participant>), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let event = sqlx::query_as::<_, Event>("SELECT * FROM events WHERE edit_id = $1 FOR UPDATE")
            .bind(edit_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::not_found("Event"))?;

        let participants = sqlx::query_as::<_, Participant>(
            "SELECT * FROM participants WHERE event_id = $1 ORDER BY created_at ASC",
        )
            .bind(&event.id)
            .fetch_all(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        for table in ["comments", "participants", "invitations"] {
            sqlx::query(&format!("DELETE FROM {} WHERE event_id = $1", table))
                .bind(&event.id)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?;
        }

        sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(&event.id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok((event, participants))
    }
}
