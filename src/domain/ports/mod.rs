use crate::domain::models::{
    comment::Comment,
    event::{Event, EventPatch},
    invitation::{Invitation, Redemption},
    job::Job,
    participant::Participant,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, event: &Event) -> Result<Event, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError>;
    /// Locks the event, merges `patch` and validates the result against the
    /// participant count read under the same lock, then writes.
    async fn update_checked(&self, edit_id: &str, patch: &EventPatch) -> Result<Event, AppError>;
    /// Deletes the event and everything it owns. Returns the event and the
    /// roster as they were just before the delete.
    async fn delete_cascade(&self, edit_id: &str) -> Result<(Event, Vec<Participant>), AppError>;
}

#[async_trait]
pub trait InvitationRepository: Send + Sync {
    async fn create(&self, invitation: &Invitation) -> Result<Invitation, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Invitation>, AppError>;
    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Invitation>, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
    /// Exchanges the token for a participant in one atomic unit. On any
    /// failure the token is left in place.
    async fn redeem(&self, invitation_id: &str, redemption: &Redemption) -> Result<Participant, AppError>;
}

#[async_trait]
pub trait ParticipantRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<Participant>, AppError>;
    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Participant>, AppError>;
    /// Removes the participant together with the comments they authored.
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn create(&self, comment: &Comment) -> Result<Comment, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Comment>, AppError>;
    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Comment>, AppError>;
    async fn delete_many(&self, event_id: &str, ids: &[String]) -> Result<u64, AppError>;
}

#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn create(&self, job: &Job) -> Result<Job, AppError>;
    /// Claims up to `limit` due jobs, moving them to PROCESSING and counting
    /// the attempt. PROCESSING jobs whose lease ran out are claimed again,
    /// or marked FAILED once they have used up their attempts.
    async fn find_pending(&self, limit: i32) -> Result<Vec<Job>, AppError>;
    async fn update_status(&self, id: &str, status: &str, error_message: Option<String>) -> Result<(), AppError>;
    async fn schedule_retry(&self, id: &str, execute_at: DateTime<Utc>, error_message: String) -> Result<(), AppError>;
}

#[async_trait]
pub trait EmailService: Send + Sync {
    async fn send(&self, recipient: &str, subject: &str, html_body: &str, attachment_name: Option<&str>, attachment_data: Option<&[u8]>) -> Result<(), AppError>;
}
