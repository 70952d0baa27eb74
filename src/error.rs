use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

// 2067 = SQLite unique constraint, 23505 = PostgreSQL unique violation
const UNIQUE_VIOLATION_CODES: [&str; 2] = ["2067", "23505"];
// 787 = SQLite foreign key constraint, 23503 = PostgreSQL foreign key violation
const FOREIGN_KEY_VIOLATION_CODES: [&str; 2] = ["787", "23503"];

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    /// Also used for credential mismatches, so callers cannot test for
    /// the existence of an entity they hold no rights over.
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Internal server error")]
    Internal,
    #[error("Internal server error: {0}")]
    InternalWithMsg(String),
}

impl AppError {
    pub fn not_found(entity: &str) -> Self {
        AppError::NotFound(format!("{} not found", entity))
    }

    pub fn is_unique_violation(&self) -> bool {
        self.database_code().is_some_and(|c| UNIQUE_VIOLATION_CODES.contains(&c.as_str()))
    }

    pub fn is_foreign_key_violation(&self) -> bool {
        self.database_code().is_some_and(|c| FOREIGN_KEY_VIOLATION_CODES.contains(&c.as_str()))
    }

    /// Rewrites a constraint violation that lost a race against a
    /// concurrent writer into a validation failure. Anything else passes
    /// through untouched.
    pub fn constraint_as_validation(self, msg: &str) -> Self {
        if self.is_unique_violation() || self.is_foreign_key_violation() {
            AppError::Validation(msg.to_string())
        } else {
            self
        }
    }

    fn database_code(&self) -> Option<String> {
        match self {
            AppError::Database(e) => e
                .as_database_error()
                .and_then(|db_err| db_err.code())
                .map(|code| code.into_owned()),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Database(e) => {
                if self.is_unique_violation() {
                    (StatusCode::BAD_REQUEST, "Resource already exists (duplicate entry)".to_string())
                } else if self.is_foreign_key_violation() {
                    (StatusCode::BAD_REQUEST, "Referenced resource no longer exists".to_string())
                } else {
                    error!("Database error: {:?}", e);
                    (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
                }
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string()),
            AppError::InternalWithMsg(msg) => {
                error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
