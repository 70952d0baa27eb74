use crate::domain::{
    models::{event::Event, invitation::{Invitation, Redemption}, participant::Participant},
    ports::InvitationRepository,
};
use crate::error::AppError;
use crate::infra::repositories::sqlite_tx::{begin_immediate, finish};
use async_trait::async_trait;
use sqlx::{Row, SqliteConnection, SqlitePool};

pub struct SqliteInvitationRepo {
    pool: SqlitePool,
}

impl SqliteInvitationRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn redeem_locked(conn: &mut SqliteConnection, invitation_id: &str, redemption: &Redemption) -> Result<Participant, AppError> {
        let invitation = sqlx::query_as::<_, Invitation>("SELECT * FROM invitations WHERE id = ?")
            .bind(invitation_id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(AppError::Database)?
            .filter(|inv| inv.is_kind(redemption.kind))
            .ok_or_else(|| AppError::not_found("Invitation"))?;

        let name = invitation.token()?.participant_name(redemption.name.as_deref())?;

        let event = sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = ?")
            .bind(&invitation.event_id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::not_found("Event"))?;

        let count: i64 = sqlx::query("SELECT COUNT(*) AS count FROM participants WHERE event_id = ?")
            .bind(&event.id)
            .fetch_one(&mut *conn)
            .await
            .map_err(AppError::Database)?
            .get("count");

        if event.is_full(count) {
            return Err(AppError::Validation("Event is full".into()));
        }

        let duplicate = sqlx::query("SELECT 1 FROM participants WHERE event_id = ? AND email = ?")
            .bind(&event.id)
            .bind(&redemption.email)
            .fetch_optional(&mut *conn)
            .await
            .map_err(AppError::Database)?;
        if duplicate.is_some() {
            return Err(AppError::Validation("This email is already registered for the event".into()));
        }

        let participant = Participant::new(event.id.clone(), name, redemption.email.clone());
        let created = sqlx::query_as::<_, Participant>(
            "INSERT INTO participants (id, event_id, name, email, created_at) VALUES (?, ?, ?, ?, ?) RETURNING *",
        )
            .bind(&participant.id)
            .bind(&participant.event_id)
            .bind(&participant.name)
            .bind(&participant.email)
            .bind(participant.created_at)
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| AppError::Database(e).constraint_as_validation("This email is already registered for the event"))?;

        let burned = sqlx::query("DELETE FROM invitations WHERE id = ?")
            .bind(&invitation.id)
            .execute(&mut *conn)
            .await
            .map_err(AppError::Database)?;
        if burned.rows_affected() != 1 {
            return Err(AppError::not_found("Invitation"));
        }

        Ok(created)
    }
}

#[async_trait]
impl InvitationRepository for SqliteInvitationRepo {
    async fn create(&self, invitation: &Invitation) -> Result<Invitation, AppError> {
        sqlx::query_as::<_, Invitation>(
            "INSERT INTO invitations (id, event_id, kind, name, created_at) VALUES (?, ?, ?, ?, ?) RETURNING *",
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
        sqlx::query_as::<_, Invitation>("SELECT * FROM invitations WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Invitation>, AppError> {
        sqlx::query_as::<_, Invitation>("SELECT * FROM invitations WHERE event_id = ? ORDER BY created_at ASC")
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM invitations WHERE id = ?")
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
        let mut tx = begin_immediate(&self.pool).await?;
        let result = Self::redeem_locked(&mut *tx, invitation_id, redemption).await;
        finish(tx, result).await
    }
}
