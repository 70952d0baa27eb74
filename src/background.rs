use std::sync::Arc;
use std::time::Duration;
use chrono::Utc;
use tokio::time::sleep;
use tracing::{error, info, warn, info_span, Instrument};
use crate::state::AppState;
use crate::domain::models::job::{Job, Notification, MAX_ATTEMPTS};
use crate::domain::services::calendar::generate_ics;
use crate::error::AppError;

const POLL_INTERVAL: Duration = Duration::from_secs(5);
const BATCH_SIZE: i32 = 10;
const RETRY_BACKOFF_SECS: i64 = 30;

pub async fn start_background_worker(state: Arc<AppState>) {
    info!("Starting background job worker...");

    loop {
        process_pending_jobs(&state).await;
        sleep(POLL_INTERVAL).await;
    }
}

/// Claims and runs one batch of due jobs. Returns how many were claimed.
pub async fn process_pending_jobs(state: &Arc<AppState>) -> usize {
    let jobs = match state.job_repo.find_pending(BATCH_SIZE).await {
        Ok(jobs) => jobs,
        Err(e) => {
            error!("Failed to fetch pending jobs: {:?}", e);
            return 0;
        }
    };

    let claimed = jobs.len();
    for job in jobs {
        let span = info_span!(
            "background_job",
            job_id = %job.id,
            job_type = %job.job_type,
            attempt = job.attempts
        );

        async {
            info!("Processing job: {}", job.job_type);
            match process_job(state, &job).await {
                Ok(_) => {
                    info!("Job completed successfully");
                    if let Err(e) = state.job_repo.update_status(&job.id, "COMPLETED", None).await {
                        error!("Failed to mark job as completed: {:?}", e);
                    }
                }
                Err(e) => record_failure(state, &job, format!("{}", e)).await,
            }
        }
            .instrument(span)
            .await;
    }
    claimed
}

async fn record_failure(state: &Arc<AppState>, job: &Job, err_msg: String) {
    // The claim already counted this attempt.
    let attempts = job.attempts;
    if attempts >= MAX_ATTEMPTS {
        error!("Job failed permanently after {} attempts: {}", attempts, err_msg);
        if let Err(up_err) = state.job_repo.update_status(&job.id, "FAILED", Some(err_msg)).await {
            error!("Failed to mark job as failed: {:?}", up_err);
        }
        return;
    }

    let retry_at = Utc::now() + chrono::Duration::seconds(RETRY_BACKOFF_SECS * attempts as i64);
    warn!("Job failed, retrying at {}: {}", retry_at, err_msg);
    if let Err(up_err) = state.job_repo.schedule_retry(&job.id, retry_at, err_msg).await {
        error!("Failed to reschedule job: {:?}", up_err);
    }
}

struct Rendered {
    subject: String,
    template: &'static str,
    context: tera::Context,
    attachment: Option<Vec<u8>>,
}

async fn process_job(state: &Arc<AppState>, job: &Job) -> Result<(), AppError> {
    let notification = &job.payload.0;
    let links = &state.config.notifications;

    let rendered = match notification {
        Notification::AdminLinkIssued { organizer_name, event_name, event_id, edit_id, .. } => {
            let mut context = tera::Context::new();
            context.insert("organizer_name", organizer_name);
            context.insert("event_name", event_name);
            context.insert("event_link", &links.event_link(event_id));
            context.insert("admin_link", &links.admin_link(event_id, edit_id));
            Rendered {
                subject: format!("Your event \"{}\" is ready", event_name),
                template: "admin_link.html",
                context,
                attachment: None,
            }
        }
        Notification::EventUpdated { participant_name, event_name, event_id, .. } => {
            let mut context = tera::Context::new();
            context.insert("participant_name", participant_name);
            context.insert("event_name", event_name);
            context.insert("event_link", &links.event_link(event_id));
            Rendered {
                subject: format!("\"{}\" has been updated", event_name),
                template: "event_updated.html",
                context,
                attachment: None,
            }
        }
        Notification::EventCancelled { participant_name, event_name, .. } => {
            let mut context = tera::Context::new();
            context.insert("participant_name", participant_name);
            context.insert("event_name", event_name);
            Rendered {
                subject: format!("\"{}\" has been cancelled", event_name),
                template: "event_cancelled.html",
                context,
                attachment: None,
            }
        }
        Notification::InviteSent { invitee_name, event_name, event_id, event_start, invitation_id, personalized, .. } => {
            // A deleted event took its invitations with it; the link would be dead.
            let Some(event) = state.event_repo.find_by_id(event_id).await? else {
                info!("Event {} no longer exists, dropping invite", event_id);
                return Ok(());
            };
            let participants = state.participant_repo.list_by_event(&event.id).await?;

            let mut context = tera::Context::new();
            if let Some(name) = invitee_name {
                context.insert("invitee_name", name);
            }
            context.insert("event_name", event_name);
            context.insert("start_time", &event_start.format("%Y-%m-%d %H:%M UTC").to_string());
            context.insert("accept_link", &links.invitation_link(invitation_id, *personalized));
            Rendered {
                subject: format!("You are invited to \"{}\"", event_name),
                template: "invite.html",
                context,
                attachment: Some(generate_ics(&event, &participants).into_bytes()),
            }
        }
    };

    let html = state.templates.render(rendered.template, &rendered.context).map_err(|e| {
        error!("Tera render error: {:?}", e);
        AppError::InternalWithMsg(format!("Tera render error: {:?}", e))
    })?;

    let attachment_name = rendered.attachment.as_ref().map(|_| "event.ics");
    info!("Sending {} email to {}", job.job_type, notification.recipient());
    state.email_service
        .send(notification.recipient(), &rendered.subject, &html, attachment_name, rendered.attachment.as_deref())
        .await
}
