use std::sync::Arc;
use tracing::info;

use crate::domain::{
    models::credential::credential_matches,
    ports::{EventRepository, ParticipantRepository},
};
use crate::error::AppError;

pub struct ParticipantRoster {
    participant_repo: Arc<dyn ParticipantRepository>,
    event_repo: Arc<dyn EventRepository>,
}

impl ParticipantRoster {
    pub fn new(participant_repo: Arc<dyn ParticipantRepository>, event_repo: Arc<dyn EventRepository>) -> Self {
        Self { participant_repo, event_repo }
    }

    /// Holding a participant id is enough to leave the event.
    pub async fn remove_self(&self, participant_id: &str) -> Result<(), AppError> {
        self.participant_repo.delete(participant_id).await?;
        info!(participant_id = %participant_id, "Participant left event");
        Ok(())
    }

    pub async fn remove_by_organizer(&self, participant_id: &str, edit_id: &str) -> Result<(), AppError> {
        let participant = self.participant_repo.find_by_id(participant_id).await?
            .ok_or_else(|| AppError::not_found("Participant"))?;
        let event = self.event_repo.find_by_id(&participant.event_id).await?
            .ok_or_else(|| AppError::not_found("Participant"))?;

        if !credential_matches(&event.edit_id, edit_id) {
            return Err(AppError::not_found("Participant"));
        }

        self.participant_repo.delete(&participant.id).await?;
        info!(event_id = %event.id, participant_id = %participant.id, "Participant removed by organizer");
        Ok(())
    }
}
