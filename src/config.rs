use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub mail_service_url: String,
    pub mail_service_token: String,
    pub notifications: NotificationSettings,
}

/// What outbound mail needs to know about the deployment.
#[derive(Clone)]
pub struct NotificationSettings {
    pub from_address: String,
    /// Frontend origin used to build the links in mails, without a trailing slash.
    pub base_url: String,
}

impl NotificationSettings {
    pub fn event_link(&self, event_id: &str) -> String {
        format!("{}/event/{}", self.base_url, event_id)
    }

    pub fn admin_link(&self, event_id: &str, edit_id: &str) -> String {
        format!("{}/event/{}/{}", self.base_url, event_id, edit_id)
    }

    pub fn invitation_link(&self, invitation_id: &str, personalized: bool) -> String {
        if personalized {
            format!("{}/personalized-invitation/accept/{}", self.base_url, invitation_id)
        } else {
            format!("{}/invitation/accept/{}", self.base_url, invitation_id)
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            mail_service_url: env::var("MAIL_SERVICE_URL").unwrap_or_else(|_| "http://localhost:8000/api/v1/send".to_string()),
            mail_service_token: env::var("MAIL_SERVICE_TOKEN").unwrap_or_else(|_| "test-token-1".to_string()),
            notifications: NotificationSettings {
                from_address: env::var("MAIL_FROM_ADDRESS").unwrap_or_else(|_| "noreply@localhost".to_string()),
                base_url: env::var("FRONTEND_URL")
                    .unwrap_or_else(|_| "http://localhost".to_string())
                    .trim_end_matches('/')
                    .to_string(),
            },
        }
    }
}
