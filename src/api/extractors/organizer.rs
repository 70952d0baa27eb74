use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use std::collections::HashMap;
use crate::domain::models::event::Event;
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;

/// The event addressed by `{event_id}`, resolved only when the `{edit_id}`
/// segment of the same path is its organizer credential.
pub struct OrganizerEvent(pub Event);

impl FromRequestParts<Arc<AppState>> for OrganizerEvent {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let params: Path<HashMap<String, String>> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::not_found("Event"))?;

        let (Some(event_id), Some(edit_id)) = (params.get("event_id"), params.get("edit_id")) else {
            return Err(AppError::not_found("Event"));
        };

        let event = state.events.authorize(event_id, edit_id).await?;
        Ok(OrganizerEvent(event))
    }
}
