use serde::Serialize;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::domain::models::credential;

#[derive(Debug, Serialize, FromRow, Clone)]
pub struct Participant {
    pub id: String,
    pub event_id: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl Participant {
    pub fn new(event_id: String, name: String, email: String) -> Self {
        Self {
            id: credential::new_public_id(),
            event_id,
            name,
            email,
            created_at: Utc::now(),
        }
    }
}
