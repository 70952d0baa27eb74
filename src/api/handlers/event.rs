use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use crate::state::AppState;
use crate::api::extractors::organizer::OrganizerEvent;
use crate::api::dtos::{
    requests::{CreateEventRequest, UpdateEventRequest},
    responses::{AdminEventResponse, EventCreatedResponse, PublicEventResponse},
};
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn create_event(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    info!("Creating event: {}", payload.name);
    let event = state.events.create_event(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(EventCreatedResponse::from(event))))
}

pub async fn get_event(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let view = state.events.get_public_view(&event_id).await?;
    Ok(Json(PublicEventResponse::from(view)))
}

pub async fn export_ics(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let (event, ics) = state.events.export_ics(&event_id).await?;
    let disposition = format!("attachment; filename=\"{}.ics\"", event.id);
    Ok((
        [
            (header::CONTENT_TYPE, "text/calendar; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        ics,
    ))
}

pub async fn get_admin_view(
    State(state): State<Arc<AppState>>,
    Path((event_id, edit_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let view = state.events.get_admin_view(&event_id, &edit_id).await?;
    Ok(Json(AdminEventResponse::from(view)))
}

pub async fn update_event(
    State(state): State<Arc<AppState>>,
    OrganizerEvent(event): OrganizerEvent,
    Json(payload): Json<UpdateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    let updated = state.events.update_event(&event.edit_id, payload.into()).await?;
    Ok(Json(updated))
}

pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    OrganizerEvent(event): OrganizerEvent,
) -> Result<impl IntoResponse, AppError> {
    state.events.delete_event(&event.edit_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
