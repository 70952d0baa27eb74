use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use crate::state::AppState;
use crate::api::dtos::requests::{AcceptPersonalizedInvitationRequest, IssuePersonalizedInvitationRequest};
use crate::domain::models::invitation::InvitationKind;
use crate::error::AppError;
use std::sync::Arc;

pub async fn issue_invitation(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<IssuePersonalizedInvitationRequest>,
) -> Result<impl IntoResponse, AppError> {
    let invitation = state.invitations
        .issue_personalized_invitation(&payload.event_id, &payload.edit_id, payload.name, payload.email)
        .await?;
    Ok((StatusCode::CREATED, Json(invitation)))
}

pub async fn get_invitation(
    State(state): State<Arc<AppState>>,
    Path(invitation_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let details = state.invitations
        .get_invitation_details(InvitationKind::Personalized, &invitation_id)
        .await?;
    Ok(Json(details))
}

/// The participant takes the name stored on the invitation.
pub async fn accept_invitation(
    State(state): State<Arc<AppState>>,
    Path(invitation_id): Path<String>,
    Json(payload): Json<AcceptPersonalizedInvitationRequest>,
) -> Result<impl IntoResponse, AppError> {
    let participant = state.invitations
        .redeem_personalized_invitation(&invitation_id, payload.email)
        .await?;
    Ok((StatusCode::CREATED, Json(participant)))
}

pub async fn revoke_invitation(
    State(state): State<Arc<AppState>>,
    Path((invitation_id, edit_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    state.invitations
        .revoke_invitation(InvitationKind::Personalized, &invitation_id, &edit_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
