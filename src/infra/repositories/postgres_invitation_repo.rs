use crate::domain::{
    models::{event::Event, invitation::{Invitation, Redemption}, participant::Participant},
    ports::InvitationRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{PgPool, Row};

pub struct PostgresInvitationRepo {
    pool: PgPool,
}

impl PostgresInvitationRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InvitationRepository for PostgresInvitationRepo {
    async fn create(&self, invitation: &Invitation) -> Result<Invitation, AppError> {
        sqlx::query_as::<_, Invitation>(
            "INSERT INTO invitations (id, event_id, kind, name, created_at) VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
            .bind(&invitation.id)
            .bind(&invitation.event_id)
            .bind(&invitation.kind)
            .bind(&invitation.name)
            .bind(invitation.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::Database(e).constraint_as_validation("Event no longer exists"))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Invitation>, AppError> {
        sqlx::query_as::<_, Invitation>("SELECT * FROM invitations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Invitation>, AppError> {
        sqlx::query_as::<_, Invitation>("SELECT * FROM invitations WHERE event_id = $1 ORDER BY created_at ASC")
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM invitations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Invitation"));
        }
        Ok(())
    }

    async fn redeem(&self, invitation_id: &str, redemption: &Redemption) -> Result<Participant, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let event_id: String = sqlx::query("SELECT event_id FROM invitations WHERE id = $1")
            .bind(invitation_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::not_found("Invitation"))?
            .get("event_id");

        // Lock order is event, then invitation; event deletion takes the same order.
        let event = sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1 FOR UPDATE")
            .bind(&event_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::not_found("Invitation"))?;

        let invitation = sqlx::query_as::<_, Invitation>("SELECT * FROM invitations WHERE id = $1 FOR UPDATE")
            .bind(invitation_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?
            .filter(|inv| inv.is_kind(redemption.kind))
            .ok_or_else(|| AppError::not_found("Invitation"))?;

        let name = invitation.token()?.participant_name(redemption.name.as_deref())?;

        let count: i64 = sqlx::query("SELECT COUNT(*) AS count FROM participants WHERE event_id = $1")
            .bind(&event.id)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?
            .get("count");

        if event.is_full(count) {
            return Err(AppError::Validation("Event is full".into()));
        }

        let duplicate = sqlx::query("SELECT 1 FROM participants WHERE event_id = $1 AND email = $2")
            .bind(&event.id)
            .bind(&redemption.email)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?;
        if duplicate.is_some() {
            return Err(AppError::Validation("This email is already registered for the event".into()));
        }

        let participant = Participant::new(event.id.clone(), name, redemption.email.clone());
        let created = sqlx::query_as::<_, Participant>(
            "INSERT INTO participants (id, event_id, name, email, created_at) VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
            .bind(&participant.id)
            .bind(&participant.event_id)
            .bind(&participant.name)
            .bind(&participant.email)
            .bind(participant.created_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| AppError::Database(e).constraint_as_validation("This email is already registered for the event"))?;

        let burned = sqlx::query("DELETE FROM invitations WHERE id = $1")
            .bind(&invitation.id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;
        if burned.rows_affected() != 1 {
            return Err(AppError::not_found("Invitation"));
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }
}
