use axum::{
    body::Body,
    extract::{MatchedPath, Request},
    routing::{get, post, delete},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{health, event, invitation, personalized_invitation, participant, comment};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Events
        .route("/api/v1/events", post(event::create_event))
        .route("/api/v1/events/{event_id}", get(event::get_event))
        .route("/api/v1/events/{event_id}/ics", get(event::export_ics))
        .route("/api/v1/events/{event_id}/comments", get(comment::list_comments))
        .route(
            "/api/v1/events/{event_id}/admin/{edit_id}",
            get(event::get_admin_view)
                .patch(event::update_event)
                .put(event::update_event)
                .delete(event::delete_event),
        )

        // Generic invitations
        .route("/api/v1/invitations", post(invitation::issue_invitation))
        .route("/api/v1/invitations/{invitation_id}", get(invitation::get_invitation))
        .route("/api/v1/invitations/{invitation_id}/accept", post(invitation::accept_invitation))
        .route("/api/v1/invitations/{invitation_id}/{edit_id}", delete(invitation::revoke_invitation))

        // Personalized invitations
        .route("/api/v1/personalized-invitations", post(personalized_invitation::issue_invitation))
        .route("/api/v1/personalized-invitations/{invitation_id}", get(personalized_invitation::get_invitation))
        .route("/api/v1/personalized-invitations/{invitation_id}/accept", post(personalized_invitation::accept_invitation))
        .route("/api/v1/personalized-invitations/{invitation_id}/{edit_id}", delete(personalized_invitation::revoke_invitation))

        // Roster
        .route("/api/v1/participants/{participant_id}", delete(participant::remove_self))
        .route("/api/v1/participants/{participant_id}/{edit_id}", delete(participant::remove_by_organizer))

        // Comments
        .route("/api/v1/comments", post(comment::create_comment))
        .route("/api/v1/comments/{comment_id}/{caller_id}", delete(comment::delete_comment))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    // Paths carry credentials; only the route template is recorded.
                    let route = request
                        .extensions()
                        .get::<MatchedPath>()
                        .map(|p| p.as_str().to_string())
                        .unwrap_or_default();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        route = %route,
                        version = ?request.version(),
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {}", request.method());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
