use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use crate::domain::models::event::{EventPatch, NewEventParams};

/// Lets a field tell "absent" (`None`) apart from an explicit `null`
/// (`Some(None)`). Use together with `#[serde(default)]`.
fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

#[derive(Deserialize)]
pub struct CreateEventRequest {
    pub name: String,
    pub location: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub organizer_email: String,
    pub organizer_name: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub image_url: Option<String>,
    pub capacity: Option<i32>,
}

impl From<CreateEventRequest> for NewEventParams {
    fn from(req: CreateEventRequest) -> Self {
        NewEventParams {
            name: req.name,
            location: req.location,
            start_time: req.start_time,
            end_time: req.end_time,
            organizer_email: req.organizer_email,
            organizer_name: req.organizer_name,
            description: req.description,
            link: req.link,
            image_url: req.image_url,
            capacity: req.capacity,
        }
    }
}

#[derive(Deserialize, Default)]
pub struct UpdateEventRequest {
    pub name: Option<String>,
    pub location: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub organizer_email: Option<String>,
    pub organizer_name: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub link: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub image_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub capacity: Option<Option<i32>>,
}

impl From<UpdateEventRequest> for EventPatch {
    fn from(req: UpdateEventRequest) -> Self {
        EventPatch {
            name: req.name,
            location: req.location,
            start_time: req.start_time,
            end_time: req.end_time,
            organizer_email: req.organizer_email,
            organizer_name: req.organizer_name,
            description: req.description,
            link: req.link,
            image_url: req.image_url,
            capacity: req.capacity,
        }
    }
}

#[derive(Deserialize)]
pub struct IssueInvitationRequest {
    pub event_id: String,
    pub edit_id: String,
    /// When present the invitation is also mailed to this address.
    pub email: Option<String>,
}

#[derive(Deserialize)]
pub struct IssuePersonalizedInvitationRequest {
    pub event_id: String,
    pub edit_id: String,
    pub name: String,
    pub email: Option<String>,
}

#[derive(Deserialize)]
pub struct AcceptInvitationRequest {
    pub name: String,
    pub email: String,
}

#[derive(Deserialize)]
pub struct AcceptPersonalizedInvitationRequest {
    pub email: String,
}

#[derive(Deserialize)]
pub struct CreateCommentRequest {
    pub event_id: String,
    pub author_id: String,
    pub content: String,
    pub parent_id: Option<String>,
}
