use std::sync::Arc;
use tracing::{error, info};

use crate::domain::{models::job::{Job, Notification}, ports::JobRepository};

/// Hands notifications to the job queue after the triggering write has
/// committed. Enqueue failures are logged and never reach the caller.
pub struct Notifier {
    job_repo: Arc<dyn JobRepository>,
}

impl Notifier {
    pub fn new(job_repo: Arc<dyn JobRepository>) -> Self {
        Self { job_repo }
    }

    pub async fn enqueue(&self, notification: Notification) {
        let job = Job::new(notification);
        match self.job_repo.create(&job).await {
            Ok(_) => info!(job_id = %job.id, job_type = %job.job_type, "Notification queued"),
            Err(e) => error!(
                job_type = %job.job_type,
                recipient = %job.payload.recipient(),
                "Failed to queue notification: {:?}", e
            ),
        }
    }

    pub async fn enqueue_all(&self, notifications: impl IntoIterator<Item = Notification>) {
        for notification in notifications {
            self.enqueue(notification).await;
        }
    }
}
