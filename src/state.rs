use std::sync::Arc;
use crate::domain::ports::{
    CommentRepository, EmailService, EventRepository, InvitationRepository,
    JobRepository, ParticipantRepository,
};
use crate::domain::services::{
    comment_thread::CommentThread, event_registry::EventRegistry,
    invitation_ledger::InvitationLedger, notifier::Notifier,
    participant_roster::ParticipantRoster,
};
use crate::config::Config;
use tera::Tera;

/// One storage backend's adapters.
pub struct Repositories {
    pub event_repo: Arc<dyn EventRepository>,
    pub invitation_repo: Arc<dyn InvitationRepository>,
    pub participant_repo: Arc<dyn ParticipantRepository>,
    pub comment_repo: Arc<dyn CommentRepository>,
    pub job_repo: Arc<dyn JobRepository>,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub event_repo: Arc<dyn EventRepository>,
    pub participant_repo: Arc<dyn ParticipantRepository>,
    pub job_repo: Arc<dyn JobRepository>,
    pub events: Arc<EventRegistry>,
    pub invitations: Arc<InvitationLedger>,
    pub participants: Arc<ParticipantRoster>,
    pub comments: Arc<CommentThread>,
    pub email_service: Arc<dyn EmailService>,
    pub templates: Arc<Tera>,
}

impl AppState {
    pub fn new(config: Config, repos: Repositories, email_service: Arc<dyn EmailService>, templates: Arc<Tera>) -> Self {
        let notifier = Arc::new(Notifier::new(repos.job_repo.clone()));

        let events = Arc::new(EventRegistry::new(
            repos.event_repo.clone(),
            repos.participant_repo.clone(),
            repos.invitation_repo.clone(),
            notifier.clone(),
        ));
        let invitations = Arc::new(InvitationLedger::new(
            repos.invitation_repo.clone(),
            repos.event_repo.clone(),
            notifier,
        ));
        let participants = Arc::new(ParticipantRoster::new(
            repos.participant_repo.clone(),
            repos.event_repo.clone(),
        ));
        let comments = Arc::new(CommentThread::new(
            repos.comment_repo,
            repos.participant_repo.clone(),
            repos.event_repo.clone(),
        ));

        Self {
            config,
            event_repo: repos.event_repo,
            participant_repo: repos.participant_repo,
            job_repo: repos.job_repo,
            events,
            invitations,
            participants,
            comments,
            email_service,
            templates,
        }
    }
}
