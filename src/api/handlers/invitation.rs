use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use crate::state::AppState;
use crate::api::dtos::requests::{AcceptInvitationRequest, IssueInvitationRequest};
use crate::domain::models::invitation::InvitationKind;
use crate::error::AppError;
use std::sync::Arc;

pub async fn issue_invitation(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<IssueInvitationRequest>,
) -> Result<impl IntoResponse, AppError> {
    let invitation = state.invitations
        .issue_invitation(&payload.event_id, &payload.edit_id, payload.email)
        .await?;
    Ok((StatusCode::CREATED, Json(invitation)))
}

pub async fn get_invitation(
    State(state): State<Arc<AppState>>,
    Path(invitation_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let details = state.invitations
        .get_invitation_details(InvitationKind::Generic, &invitation_id)
        .await?;
    Ok(Json(details))
}

pub async fn accept_invitation(
    State(state): State<Arc<AppState>>,
    Path(invitation_id): Path<String>,
    Json(payload): Json<AcceptInvitationRequest>,
) -> Result<impl IntoResponse, AppError> {
    let participant = state.invitations
        .redeem_invitation(&invitation_id, payload.name, payload.email)
        .await?;
    Ok((StatusCode::CREATED, Json(participant)))
}

pub async fn revoke_invitation(
    State(state): State<Arc<AppState>>,
    Path((invitation_id, edit_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    state.invitations
        .revoke_invitation(InvitationKind::Generic, &invitation_id, &edit_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
