#![allow(dead_code)]

use event_planner::{
    api::router::create_router,
    config::{Config, NotificationSettings},
    domain::ports::EmailService,
    error::AppError,
    infra::factory::{load_templates, sqlite_repositories},
    state::AppState,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions}, Pool, Sqlite};
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;
use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    Router,
};
use async_trait::async_trait;
use tower::ServiceExt;
use serde_json::{json, Value};

#[derive(Debug, Clone)]
pub struct SentMail {
    pub recipient: String,
    pub subject: String,
    pub html_body: String,
    pub attachment_name: Option<String>,
    pub attachment: Option<Vec<u8>>,
}

/// Records every mail instead of delivering it. With `fail` set every send
/// errors, which drives the worker's retry path.
#[derive(Default)]
pub struct MockEmailService {
    pub sent: Mutex<Vec<SentMail>>,
    pub fail: bool,
}

impl MockEmailService {
    pub fn failing() -> Self {
        Self { sent: Mutex::new(Vec::new()), fail: true }
    }

    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailService for MockEmailService {
    async fn send(
        &self,
        recipient: &str,
        subject: &str,
        html_body: &str,
        attachment_name: Option<&str>,
        attachment_data: Option<&[u8]>
    ) -> Result<(), AppError> {
        if self.fail {
            return Err(AppError::InternalWithMsg("mail relay unavailable".into()));
        }
        self.sent.lock().unwrap().push(SentMail {
            recipient: recipient.to_string(),
            subject: subject.to_string(),
            html_body: html_body.to_string(),
            attachment_name: attachment_name.map(str::to_string),
            attachment: attachment_data.map(<[u8]>::to_vec),
        });
        Ok(())
    }
}

pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    pub mailer: Arc<MockEmailService>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_mailer(MockEmailService::default()).await
    }

    pub async fn with_mailer(mailer: MockEmailService) -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(10))
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            mail_service_url: "http://localhost".to_string(),
            mail_service_token: "token".to_string(),
            notifications: NotificationSettings {
                from_address: "noreply@example.org".to_string(),
                base_url: "https://plan.example.org".to_string(),
            },
        };

        let mailer = Arc::new(mailer);
        let state = Arc::new(AppState::new(
            config,
            sqlite_repositories(&pool),
            mailer.clone(),
            Arc::new(load_templates()),
        ));

        // The worker is not spawned; tests drive it with `process_pending_jobs`.
        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
            mailer,
        }
    }

    pub async fn request(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        send(&self.router, method, uri, body).await
    }

    /// Creates an event and returns `(event_id, edit_id)`.
    pub async fn create_event(&self, capacity: Option<i32>) -> (String, String) {
        let (status, body) = self.request("POST", "/api/v1/events", Some(event_payload(capacity))).await;
        assert_eq!(status, StatusCode::CREATED, "create event failed: {}", body);
        (
            body["id"].as_str().unwrap().to_string(),
            body["edit_id"].as_str().unwrap().to_string(),
        )
    }

    /// Issues a generic invitation and returns its id.
    pub async fn invite(&self, event_id: &str, edit_id: &str) -> String {
        let (status, body) = self.request("POST", "/api/v1/invitations", Some(json!({
            "event_id": event_id,
            "edit_id": edit_id,
        }))).await;
        assert_eq!(status, StatusCode::CREATED, "issue invitation failed: {}", body);
        body["id"].as_str().unwrap().to_string()
    }

    /// Issues and redeems a generic invitation; returns the participant id.
    pub async fn join(&self, event_id: &str, edit_id: &str, name: &str, email: &str) -> String {
        let invitation_id = self.invite(event_id, edit_id).await;
        let (status, body) = self.request(
            "POST",
            &format!("/api/v1/invitations/{}/accept", invitation_id),
            Some(json!({ "name": name, "email": email })),
        ).await;
        assert_eq!(status, StatusCode::CREATED, "redeem failed: {}", body);
        body["id"].as_str().unwrap().to_string()
    }

    pub async fn count(&self, table: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }
}

pub async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = router.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

pub fn event_payload(capacity: Option<i32>) -> Value {
    json!({
        "name": "Summer picnic",
        "location": "Riverside park",
        "start_time": "2030-07-01T12:00:00Z",
        "end_time": "2030-07-01T17:00:00Z",
        "organizer_email": "host@example.org",
        "organizer_name": "Hosting Hal",
        "description": "Bring a blanket",
        "capacity": capacity,
    })
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}
