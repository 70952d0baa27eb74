use serde::Serialize;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::domain::models::{credential, require_text, validate_email};
use crate::error::AppError;

/// Which redemption path a token belongs to. Stored in `invitations.kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvitationKind {
    Generic,
    Personalized,
}

impl InvitationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvitationKind::Generic => "GENERIC",
            InvitationKind::Personalized => "PERSONALIZED",
        }
    }
}

#[derive(Debug, Serialize, FromRow, Clone)]
pub struct Invitation {
    pub id: String,
    pub event_id: String,
    pub kind: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The capability a stored invitation row grants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvitationToken {
    /// Bearer token; the redeemer supplies their own name.
    Generic,
    /// Bound to a name at issuance; the redeemer only supplies an email.
    Personalized { name: String },
}

/// What a caller presents when redeeming.
#[derive(Debug, Clone)]
pub struct Redemption {
    pub kind: InvitationKind,
    pub name: Option<String>,
    pub email: String,
}

impl Invitation {
    pub fn generic(event_id: String) -> Self {
        Self {
            id: credential::new_public_id(),
            event_id,
            kind: InvitationKind::Generic.as_str().to_string(),
            name: None,
            created_at: Utc::now(),
        }
    }

    pub fn personalized(event_id: String, name: String) -> Result<Self, AppError> {
        require_text("name", &name)?;
        Ok(Self {
            id: credential::new_public_id(),
            event_id,
            kind: InvitationKind::Personalized.as_str().to_string(),
            name: Some(name.trim().to_string()),
            created_at: Utc::now(),
        })
    }

    pub fn token(&self) -> Result<InvitationToken, AppError> {
        match (self.kind.as_str(), &self.name) {
            ("GENERIC", _) => Ok(InvitationToken::Generic),
            ("PERSONALIZED", Some(name)) => Ok(InvitationToken::Personalized { name: name.clone() }),
            (kind, _) => Err(AppError::InternalWithMsg(format!(
                "Invitation {} has unusable kind {}", self.id, kind
            ))),
        }
    }

    pub fn is_kind(&self, kind: InvitationKind) -> bool {
        self.kind == kind.as_str()
    }
}

impl InvitationToken {
    /// Resolves the display name the new participant gets. A personalized
    /// token ignores whatever name the caller supplied.
    pub fn participant_name(&self, supplied: Option<&str>) -> Result<String, AppError> {
        match self {
            InvitationToken::Generic => {
                let name = supplied.unwrap_or_default().trim();
                require_text("name", name)?;
                Ok(name.to_string())
            }
            InvitationToken::Personalized { name } => Ok(name.clone()),
        }
    }
}

impl Redemption {
    /// Input checks that do not need storage.
    pub fn validate(&self) -> Result<(), AppError> {
        validate_email(&self.email)?;
        if self.kind == InvitationKind::Generic {
            require_text("name", self.name.as_deref().unwrap_or_default())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn personalized_token_ignores_supplied_name() {
        let inv = Invitation::personalized("ev".into(), " Grace Hopper ".into()).unwrap();
        let token = inv.token().unwrap();
        assert_eq!(token.participant_name(Some("Mallory")).unwrap(), "Grace Hopper");
        assert_eq!(token.participant_name(None).unwrap(), "Grace Hopper");
    }

    #[test]
    fn generic_token_requires_a_name() {
        let inv = Invitation::generic("ev".into());
        let token = inv.token().unwrap();
        assert_eq!(token, InvitationToken::Generic);
        assert!(token.participant_name(None).is_err());
        assert!(token.participant_name(Some("   ")).is_err());
        assert_eq!(token.participant_name(Some(" Ada ")).unwrap(), "Ada");
    }

    #[test]
    fn kinds_are_not_interchangeable() {
        let inv = Invitation::generic("ev".into());
        assert!(inv.is_kind(InvitationKind::Generic));
        assert!(!inv.is_kind(InvitationKind::Personalized));
    }

    #[test]
    fn personalized_requires_bound_name() {
        assert!(Invitation::personalized("ev".into(), "".into()).is_err());
    }
}
