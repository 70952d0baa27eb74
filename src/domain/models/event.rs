use serde::Serialize;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::domain::models::{credential, require_text, validate_email};
use crate::error::AppError;

#[derive(Debug, Serialize, FromRow, Clone)]
pub struct Event {
    pub id: String,
    #[serde(skip_serializing)]
    pub edit_id: String,
    pub name: String,
    pub location: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub organizer_email: String,
    pub organizer_name: String,
    pub description: String,
    pub link: Option<String>,
    pub image_url: Option<String>,
    pub capacity: Option<i32>,
    pub created_at: DateTime<Utc>,
}

pub struct NewEventParams {
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

/// Partial update of an event.
///
/// `None` keeps the stored value. For the nullable columns the inner option
/// distinguishes "clear" (`Some(None)`) from "set" (`Some(Some(_))`).
#[derive(Debug, Default, Clone)]
pub struct EventPatch {
    pub name: Option<String>,
    pub location: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub organizer_email: Option<String>,
    pub organizer_name: Option<String>,
    pub description: Option<String>,
    pub link: Option<Option<String>>,
    pub image_url: Option<Option<String>>,
    pub capacity: Option<Option<i32>>,
}

impl Event {
    pub fn new(params: NewEventParams) -> Result<Self, AppError> {
        let event = Self {
            id: credential::new_public_id(),
            edit_id: credential::new_edit_id(),
            name: params.name.trim().to_string(),
            location: params.location.trim().to_string(),
            start_time: params.start_time,
            end_time: params.end_time,
            organizer_email: params.organizer_email.trim().to_string(),
            organizer_name: params.organizer_name.unwrap_or_default(),
            description: params.description.unwrap_or_default(),
            link: params.link.filter(|l| !l.trim().is_empty()),
            image_url: params.image_url.filter(|i| !i.trim().is_empty()),
            capacity: params.capacity,
            created_at: Utc::now(),
        };
        event.validate()?;
        Ok(event)
    }

    /// Field-level invariants that hold regardless of the roster.
    pub fn validate(&self) -> Result<(), AppError> {
        require_text("name", &self.name)?;
        require_text("location", &self.location)?;
        validate_email(&self.organizer_email)?;

        if self.start_time >= self.end_time {
            return Err(AppError::Validation("End time must be after start time".into()));
        }
        if let Some(capacity) = self.capacity
            && capacity < 1 {
            return Err(AppError::Validation("Capacity must be at least 1".into()));
        }
        if let Some(link) = &self.link
            && !(link.starts_with("http://") || link.starts_with("https://")) {
            return Err(AppError::Validation("Link must be an http(s) URL".into()));
        }
        Ok(())
    }

    pub fn is_full(&self, participant_count: i64) -> bool {
        matches!(self.capacity, Some(capacity) if participant_count >= capacity as i64)
    }

    /// Overlays `patch` on this snapshot and validates the merged result
    /// against the current roster size. Must be called with the event row
    /// locked so `participant_count` cannot move underneath the write.
    pub fn apply_patch(&self, patch: &EventPatch, participant_count: i64) -> Result<Event, AppError> {
        let mut merged = self.clone();

        if let Some(name) = &patch.name { merged.name = name.trim().to_string(); }
        if let Some(location) = &patch.location { merged.location = location.trim().to_string(); }
        if let Some(start) = patch.start_time { merged.start_time = start; }
        if let Some(end) = patch.end_time { merged.end_time = end; }
        if let Some(email) = &patch.organizer_email { merged.organizer_email = email.trim().to_string(); }
        if let Some(organizer) = &patch.organizer_name { merged.organizer_name = organizer.clone(); }
        if let Some(description) = &patch.description { merged.description = description.clone(); }
        if let Some(link) = &patch.link {
            merged.link = link.clone().filter(|l| !l.trim().is_empty());
        }
        if let Some(image) = &patch.image_url {
            merged.image_url = image.clone().filter(|i| !i.trim().is_empty());
        }
        if let Some(capacity) = patch.capacity { merged.capacity = capacity; }

        merged.validate()?;

        if let Some(capacity) = merged.capacity
            && (capacity as i64) < participant_count {
            return Err(AppError::Validation(format!(
                "Capacity {} is below the current participant count {}",
                capacity, participant_count
            )));
        }

        Ok(merged)
    }
}
