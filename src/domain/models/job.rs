use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

pub const MAX_ATTEMPTS: i32 = 3;
/// How long a claimed job may stay PROCESSING before another worker takes it back.
pub const CLAIM_LEASE_SECS: i64 = 300;

/// Outbound messages. Each variant is self-contained: the worker may run
/// after the event it describes has been deleted.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    AdminLinkIssued {
        recipient: String,
        organizer_name: String,
        event_name: String,
        event_id: String,
        edit_id: String,
    },
    EventUpdated {
        recipient: String,
        participant_name: String,
        event_name: String,
        event_id: String,
    },
    EventCancelled {
        recipient: String,
        participant_name: String,
        event_name: String,
    },
    InviteSent {
        recipient: String,
        invitee_name: Option<String>,
        event_name: String,
        event_id: String,
        event_start: DateTime<Utc>,
        invitation_id: String,
        personalized: bool,
    },
}

impl Notification {
    pub fn kind(&self) -> &'static str {
        match self {
            Notification::AdminLinkIssued { .. } => "ADMIN_LINK_ISSUED",
            Notification::EventUpdated { .. } => "EVENT_UPDATED",
            Notification::EventCancelled { .. } => "EVENT_CANCELLED",
            Notification::InviteSent { .. } => "INVITE_SENT",
        }
    }

    pub fn recipient(&self) -> &str {
        match self {
            Notification::AdminLinkIssued { recipient, .. }
            | Notification::EventUpdated { recipient, .. }
            | Notification::EventCancelled { recipient, .. }
            | Notification::InviteSent { recipient, .. } => recipient,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Job {
    pub id: String,
    pub job_type: String,
    pub payload: Json<Notification>,
    pub execute_at: DateTime<Utc>,
    pub status: String, // PENDING, PROCESSING, COMPLETED, FAILED
    pub attempts: i32,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Job {
    pub fn new(notification: Notification) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            job_type: notification.kind().to_string(),
            payload: Json(notification),
            execute_at: now,
            status: "PENDING".to_string(),
            attempts: 0,
            error_message: None,
            created_at: now,
        }
    }
}
