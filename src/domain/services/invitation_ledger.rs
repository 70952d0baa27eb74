use std::sync::Arc;
use serde::Serialize;
use tracing::{info, warn};

use crate::domain::{
    models::{
        credential::credential_matches,
        event::Event,
        invitation::{Invitation, InvitationKind, Redemption},
        job::Notification,
        normalize_email,
        participant::Participant,
        validate_email,
    },
    ports::{EventRepository, InvitationRepository},
    services::notifier::Notifier,
};
use crate::error::AppError;

/// Read-only context for a redemption landing page.
#[derive(Debug, Serialize)]
pub struct InvitationDetails {
    pub event_name: String,
    pub event_id: String,
    pub invitee_name: Option<String>,
}

pub struct InvitationLedger {
    invitation_repo: Arc<dyn InvitationRepository>,
    event_repo: Arc<dyn EventRepository>,
    notifier: Arc<Notifier>,
}

impl InvitationLedger {
    pub fn new(
        invitation_repo: Arc<dyn InvitationRepository>,
        event_repo: Arc<dyn EventRepository>,
        notifier: Arc<Notifier>,
    ) -> Self {
        Self { invitation_repo, event_repo, notifier }
    }

    async fn authorized_event(&self, event_id: &str, edit_id: &str) -> Result<Event, AppError> {
        let event = self.event_repo.find_by_id(event_id).await?
            .ok_or_else(|| AppError::not_found("Event"))?;
        if !credential_matches(&event.edit_id, edit_id) {
            return Err(AppError::not_found("Event"));
        }
        Ok(event)
    }

    /// Capacity is not checked here: an unredeemed token holds no seat.
    pub async fn issue_invitation(&self, event_id: &str, edit_id: &str, send_to: Option<String>) -> Result<Invitation, AppError> {
        let send_to = checked_recipient(send_to)?;
        let event = self.authorized_event(event_id, edit_id).await?;
        let created = self.invitation_repo.create(&Invitation::generic(event.id.clone())).await?;
        info!(event_id = %event.id, invitation_id = %created.id, "Invitation issued");

        self.send_invite(&event, &created, send_to).await;
        Ok(created)
    }

    pub async fn issue_personalized_invitation(
        &self,
        event_id: &str,
        edit_id: &str,
        name: String,
        send_to: Option<String>,
    ) -> Result<Invitation, AppError> {
        let send_to = checked_recipient(send_to)?;
        let invitation = Invitation::personalized(event_id.to_string(), name)?;
        let event = self.authorized_event(event_id, edit_id).await?;
        let created = self.invitation_repo.create(&invitation).await?;
        info!(event_id = %event.id, invitation_id = %created.id, "Personalized invitation issued");

        self.send_invite(&event, &created, send_to).await;
        Ok(created)
    }

    pub async fn redeem_invitation(&self, invitation_id: &str, name: String, email: String) -> Result<Participant, AppError> {
        self.redeem(invitation_id, Redemption {
            kind: InvitationKind::Generic,
            name: Some(name),
            email: normalize_email(&email),
        }).await
    }

    /// The participant's name always comes from the token.
    pub async fn redeem_personalized_invitation(&self, invitation_id: &str, email: String) -> Result<Participant, AppError> {
        self.redeem(invitation_id, Redemption {
            kind: InvitationKind::Personalized,
            name: None,
            email: normalize_email(&email),
        }).await
    }

    async fn redeem(&self, invitation_id: &str, redemption: Redemption) -> Result<Participant, AppError> {
        redemption.validate()?;
        match self.invitation_repo.redeem(invitation_id, &redemption).await {
            Ok(participant) => {
                info!(
                    invitation_id = %invitation_id,
                    event_id = %participant.event_id,
                    participant_id = %participant.id,
                    "Invitation redeemed"
                );
                Ok(participant)
            }
            Err(e) => {
                if matches!(e, AppError::Validation(_) | AppError::NotFound(_)) {
                    warn!(invitation_id = %invitation_id, "Redemption rejected: {}", e);
                }
                Err(e)
            }
        }
    }

    pub async fn revoke_invitation(&self, kind: InvitationKind, invitation_id: &str, edit_id: &str) -> Result<(), AppError> {
        let invitation = self.find_kind(kind, invitation_id).await?;
        let event = self.event_repo.find_by_id(&invitation.event_id).await?
            .ok_or_else(|| AppError::not_found("Invitation"))?;
        if !credential_matches(&event.edit_id, edit_id) {
            return Err(AppError::not_found("Invitation"));
        }

        self.invitation_repo.delete(&invitation.id).await?;
        info!(event_id = %event.id, invitation_id = %invitation.id, "Invitation revoked");
        Ok(())
    }

    pub async fn get_invitation_details(&self, kind: InvitationKind, invitation_id: &str) -> Result<InvitationDetails, AppError> {
        let invitation = self.find_kind(kind, invitation_id).await?;
        let event = self.event_repo.find_by_id(&invitation.event_id).await?
            .ok_or_else(|| AppError::not_found("Invitation"))?;
        Ok(InvitationDetails {
            event_name: event.name,
            event_id: event.id,
            invitee_name: invitation.name,
        })
    }

    async fn find_kind(&self, kind: InvitationKind, invitation_id: &str) -> Result<Invitation, AppError> {
        self.invitation_repo.find_by_id(invitation_id).await?
            .filter(|inv| inv.is_kind(kind))
            .ok_or_else(|| AppError::not_found("Invitation"))
    }

    async fn send_invite(&self, event: &Event, invitation: &Invitation, send_to: Option<String>) {
        let Some(recipient) = send_to else { return };
        self.notifier.enqueue(Notification::InviteSent {
            recipient,
            invitee_name: invitation.name.clone(),
            event_name: event.name.clone(),
            event_id: event.id.clone(),
            event_start: event.start_time,
            invitation_id: invitation.id.clone(),
            personalized: invitation.is_kind(InvitationKind::Personalized),
        }).await;
    }
}

fn checked_recipient(send_to: Option<String>) -> Result<Option<String>, AppError> {
    match send_to.map(|e| normalize_email(&e)).filter(|e| !e.is_empty()) {
        Some(email) => {
            validate_email(&email)?;
            Ok(Some(email))
        }
        None => Ok(None),
    }
}
