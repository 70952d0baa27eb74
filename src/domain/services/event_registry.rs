use std::sync::Arc;
use tracing::{error, info};

use crate::domain::{
    models::{
        credential::credential_matches,
        event::{Event, EventPatch, NewEventParams},
        invitation::Invitation,
        job::Notification,
        participant::Participant,
    },
    ports::{EventRepository, InvitationRepository, ParticipantRepository},
    services::{calendar::generate_ics, notifier::Notifier},
};
use crate::error::AppError;

/// What anyone holding the public id may see.
pub struct PublicEventView {
    pub event: Event,
    pub participant_names: Vec<String>,
}

/// What the organizer sees.
pub struct AdminEventView {
    pub event: Event,
    pub participants: Vec<Participant>,
    pub invitations: Vec<Invitation>,
}

pub struct EventRegistry {
    event_repo: Arc<dyn EventRepository>,
    participant_repo: Arc<dyn ParticipantRepository>,
    invitation_repo: Arc<dyn InvitationRepository>,
    notifier: Arc<Notifier>,
}

impl EventRegistry {
    pub fn new(
        event_repo: Arc<dyn EventRepository>,
        participant_repo: Arc<dyn ParticipantRepository>,
        invitation_repo: Arc<dyn InvitationRepository>,
        notifier: Arc<Notifier>,
    ) -> Self {
        Self { event_repo, participant_repo, invitation_repo, notifier }
    }

    pub async fn create_event(&self, params: NewEventParams) -> Result<Event, AppError> {
        let event = Event::new(params)?;
        let created = self.event_repo.create(&event).await?;
        info!(event_id = %created.id, "Event created");

        self.notifier.enqueue(Notification::AdminLinkIssued {
            recipient: created.organizer_email.clone(),
            organizer_name: created.organizer_name.clone(),
            event_name: created.name.clone(),
            event_id: created.id.clone(),
            edit_id: created.edit_id.clone(),
        }).await;

        Ok(created)
    }

    pub async fn get_by_public_id(&self, event_id: &str) -> Result<Event, AppError> {
        self.event_repo.find_by_id(event_id).await?
            .ok_or_else(|| AppError::not_found("Event"))
    }

    pub async fn get_public_view(&self, event_id: &str) -> Result<PublicEventView, AppError> {
        let event = self.get_by_public_id(event_id).await?;
        let participant_names = self.participant_repo.list_by_event(&event.id).await?
            .into_iter()
            .map(|p| p.name)
            .collect();
        Ok(PublicEventView { event, participant_names })
    }

    /// Resolves an event by public id and checks the presented edit id
    /// against it. Any mismatch reads as a missing event.
    pub async fn authorize(&self, event_id: &str, edit_id: &str) -> Result<Event, AppError> {
        let event = self.get_by_public_id(event_id).await?;
        if !credential_matches(&event.edit_id, edit_id) {
            return Err(AppError::not_found("Event"));
        }
        Ok(event)
    }

    pub async fn get_admin_view(&self, event_id: &str, edit_id: &str) -> Result<AdminEventView, AppError> {
        let event = self.authorize(event_id, edit_id).await?;
        let participants = self.participant_repo.list_by_event(&event.id).await?;
        let invitations = self.invitation_repo.list_by_event(&event.id).await?;
        Ok(AdminEventView { event, participants, invitations })
    }

    pub async fn update_event(&self, edit_id: &str, patch: EventPatch) -> Result<Event, AppError> {
        let updated = self.event_repo.update_checked(edit_id, &patch).await?;
        info!(event_id = %updated.id, "Event updated");

        match self.participant_repo.list_by_event(&updated.id).await {
            Ok(participants) => {
                self.notifier.enqueue_all(participants.into_iter().map(|p| Notification::EventUpdated {
                    recipient: p.email,
                    participant_name: p.name,
                    event_name: updated.name.clone(),
                    event_id: updated.id.clone(),
                })).await;
            }
            Err(e) => error!(event_id = %updated.id, "Could not load roster for update notices: {:?}", e),
        }

        Ok(updated)
    }

    pub async fn delete_event(&self, edit_id: &str) -> Result<(), AppError> {
        let (event, participants) = self.event_repo.delete_cascade(edit_id).await?;
        info!(event_id = %event.id, participants = participants.len(), "Event deleted");

        self.notifier.enqueue_all(participants.into_iter().map(|p| Notification::EventCancelled {
            recipient: p.email,
            participant_name: p.name,
            event_name: event.name.clone(),
        })).await;

        Ok(())
    }

    pub async fn export_ics(&self, event_id: &str) -> Result<(Event, String), AppError> {
        let event = self.get_by_public_id(event_id).await?;
        let participants = self.participant_repo.list_by_event(&event.id).await?;
        let ics = generate_ics(&event, &participants);
        Ok((event, ics))
    }
}
