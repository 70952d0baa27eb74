use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;
use tera::Tera;

use crate::config::Config;
use crate::state::{AppState, Repositories};
use crate::infra::email::http_email_service::HttpEmailService;
use crate::infra::repositories::{
    postgres_comment_repo::PostgresCommentRepo, postgres_event_repo::PostgresEventRepo,
    postgres_invitation_repo::PostgresInvitationRepo, postgres_job_repo::PostgresJobRepo,
    postgres_participant_repo::PostgresParticipantRepo,
    sqlite_comment_repo::SqliteCommentRepo, sqlite_event_repo::SqliteEventRepo,
    sqlite_invitation_repo::SqliteInvitationRepo, sqlite_job_repo::SqliteJobRepo,
    sqlite_participant_repo::SqliteParticipantRepo,
};

/// Names under which the mail templates are registered.
pub const TEMPLATES: [(&str, &str); 4] = [
    ("admin_link.html", include_str!("../templates/admin_link.html")),
    ("event_updated.html", include_str!("../templates/event_updated.html")),
    ("event_cancelled.html", include_str!("../templates/event_cancelled.html")),
    ("invite.html", include_str!("../templates/invite.html")),
];

pub fn load_templates() -> Tera {
    let mut tera = Tera::default();
    tera.add_raw_templates(TEMPLATES).expect("Failed to load mail templates");
    tera
}

pub fn sqlite_repositories(pool: &SqlitePool) -> Repositories {
    Repositories {
        event_repo: Arc::new(SqliteEventRepo::new(pool.clone())),
        invitation_repo: Arc::new(SqliteInvitationRepo::new(pool.clone())),
        participant_repo: Arc::new(SqliteParticipantRepo::new(pool.clone())),
        comment_repo: Arc::new(SqliteCommentRepo::new(pool.clone())),
        job_repo: Arc::new(SqliteJobRepo::new(pool.clone())),
    }
}

pub fn postgres_repositories(pool: &PgPool) -> Repositories {
    Repositories {
        event_repo: Arc::new(PostgresEventRepo::new(pool.clone())),
        invitation_repo: Arc::new(PostgresInvitationRepo::new(pool.clone())),
        participant_repo: Arc::new(PostgresParticipantRepo::new(pool.clone())),
        comment_repo: Arc::new(PostgresCommentRepo::new(pool.clone())),
        job_repo: Arc::new(PostgresJobRepo::new(pool.clone())),
    }
}

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;
    let email_service = Arc::new(HttpEmailService::new(
        config.mail_service_url.clone(),
        config.mail_service_token.clone(),
        config.notifications.from_address.clone(),
    ));

    let templates = Arc::new(load_templates());

    let repos = if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;
        postgres_repositories(&pool)
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .foreign_keys(true)
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;
        sqlite_repositories(&pool)
    };

    AppState::new(config.clone(), repos, email_service, templates)
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
