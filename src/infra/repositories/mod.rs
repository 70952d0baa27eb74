pub mod sqlite_tx;
pub mod sqlite_event_repo;
pub mod sqlite_invitation_repo;
pub mod sqlite_participant_repo;
pub mod sqlite_comment_repo;
pub mod sqlite_job_repo;

pub mod postgres_event_repo;
pub mod postgres_invitation_repo;
pub mod postgres_participant_repo;
pub mod postgres_comment_repo;
pub mod postgres_job_repo;
