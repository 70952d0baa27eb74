use serde::Serialize;
use crate::domain::models::{event::Event, invitation::Invitation, participant::Participant};
use crate::domain::services::event_registry::{AdminEventView, PublicEventView};

/// Returned once, to the creator. The edit id is not retrievable afterwards
/// except through the admin mail.
#[derive(Serialize)]
pub struct EventCreatedResponse {
    #[serde(flatten)]
    pub event: Event,
    pub edit_id: String,
}

impl From<Event> for EventCreatedResponse {
    fn from(event: Event) -> Self {
        let edit_id = event.edit_id.clone();
        Self { event, edit_id }
    }
}

#[derive(Serialize)]
pub struct PublicEventResponse {
    #[serde(flatten)]
    pub event: Event,
    pub participant_count: usize,
    pub participants: Vec<String>,
}

impl From<PublicEventView> for PublicEventResponse {
    fn from(view: PublicEventView) -> Self {
        Self {
            event: view.event,
            participant_count: view.participant_names.len(),
            participants: view.participant_names,
        }
    }
}

#[derive(Serialize)]
pub struct AdminEventResponse {
    #[serde(flatten)]
    pub event: Event,
    pub edit_id: String,
    pub participants: Vec<Participant>,
    pub invitations: Vec<Invitation>,
}

impl From<AdminEventView> for AdminEventResponse {
    fn from(view: AdminEventView) -> Self {
        let edit_id = view.event.edit_id.clone();
        Self {
            event: view.event,
            edit_id,
            participants: view.participants,
            invitations: view.invitations,
        }
    }
}
