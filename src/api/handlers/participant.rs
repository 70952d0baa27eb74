use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use crate::state::AppState;
use crate::error::AppError;
use std::sync::Arc;

pub async fn remove_self(
    State(state): State<Arc<AppState>>,
    Path(participant_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.participants.remove_self(&participant_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove_by_organizer(
    State(state): State<Arc<AppState>>,
    Path((participant_id, edit_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    state.participants.remove_by_organizer(&participant_id, &edit_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
