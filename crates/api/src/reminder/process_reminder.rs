use super::get_reminder::GetReminderUseCase;
use crate::{
    error::WeddingError,
    shared::usecase::{execute, UseCase},
};
use actix_web::{rt::time::timeout, web, HttpResponse};
use tracing::{debug, error, warn};
use wedding_planner_api_structs::process_reminder::*;
use wedding_planner_domain::{Reminder, ReminderStatus, EMAIL_CHANNEL, ID};
use wedding_planner_infra::{MarkSentResult, WeddingContext};

pub async fn process_reminder_controller(
    path: web::Path<PathParams>,
    query: web::Query<QueryParams>,
    ctx: web::Data<WeddingContext>,
) -> Result<HttpResponse, WeddingError> {
    let reminder = execute(
        GetReminderUseCase {
            reminder_id: path.reminder_id.clone(),
        },
        &ctx,
    )
    .await
    .map_err(WeddingError::from)?;

    let notify_target = query
        .into_inner()
        .email
        .map(|email| email.trim().to_string())
        .filter(|email| !email.is_empty());

    let usecase = ProcessReminderUseCase {
        reminder,
        notify_target,
    };

    execute(usecase, &ctx)
        .await
        .map(|_| HttpResponse::Ok().json(APIResponse::new("Reminder processed successfully")))
        .map_err(WeddingError::from)
}

/// Delivers a due `Reminder`, marks it as sent and schedules the next
/// `Reminder` of its recurrence chain.
///
/// The reminder has to be `Pending` and due. Channel decoding and the
/// recurrence computation happen before anything is written, so a failure
/// there leaves the reminder untouched. Notifications are best effort and
/// are only dispatched by the caller that won the `pending -> sent` transition.
#[derive(Debug)]
pub struct ProcessReminderUseCase {
    pub reminder: Reminder,
    /// Destination of email notifications. No emails are sent without it.
    pub notify_target: Option<String>,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotYetDue(ID),
    AlreadyProcessed(ID),
    /// Another caller processed the reminder between the precondition check
    /// and the status transition
    ProcessedConcurrently(ID),
    NotFound(ID),
    MalformedChannels(ID, String),
    InvalidRecurrence(ID, String),
    StorageError,
}

impl From<UseCaseError> for WeddingError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotYetDue(_) => Self::BadClientData("Reminder is not yet due".into()),
            UseCaseError::AlreadyProcessed(_) => {
                Self::BadClientData("Reminder has already been processed".into())
            }
            UseCaseError::ProcessedConcurrently(_) => {
                Self::Conflict("Reminder has already been processed".into())
            }
            UseCaseError::NotFound(_) => Self::NotFound("Reminder not found".into()),
            UseCaseError::MalformedChannels(..)
            | UseCaseError::InvalidRecurrence(..)
            | UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct NotificationsReport {
    pub delivered: usize,
    pub failed: usize,
}

#[derive(Debug)]
pub struct UseCaseRes {
    pub reminder: Reminder,
    pub successor: Option<Reminder>,
    pub notifications: NotificationsReport,
}

impl ProcessReminderUseCase {
    async fn notify(&self, channels: &[String], ctx: &WeddingContext) -> NotificationsReport {
        let mut report = NotificationsReport::default();
        let destination = match &self.notify_target {
            Some(destination) => destination,
            None => return report,
        };

        for channel in channels {
            if channel != EMAIL_CHANNEL {
                debug!("Channel: {} is delivered by the client, skipping", channel);
                continue;
            }

            let send = ctx
                .notifier
                .send(destination, &self.reminder.title, self.reminder.body());
            match timeout(ctx.config.notification_timeout, send).await {
                Ok(Ok(())) => report.delivered += 1,
                Ok(Err(e)) => {
                    warn!(
                        "Failed to send email for reminder {}: {:?}",
                        self.reminder.id, e
                    );
                    report.failed += 1;
                }
                Err(_) => {
                    warn!(
                        "Sending email for reminder {} timed out after {:?}",
                        self.reminder.id, ctx.config.notification_timeout
                    );
                    report.failed += 1;
                }
            }
        }

        report
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for ProcessReminderUseCase {
    type Response = UseCaseRes;

    type Error = UseCaseError;

    const NAME: &'static str = "ProcessReminder";

    async fn execute(&mut self, ctx: &WeddingContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.now();
        let reminder_id = self.reminder.id.clone();

        if self.reminder.status != ReminderStatus::Pending {
            return Err(UseCaseError::AlreadyProcessed(reminder_id));
        }
        if self.reminder.remind_at > now {
            return Err(UseCaseError::NotYetDue(reminder_id));
        }

        let channels = self
            .reminder
            .notification_channels
            .decode()
            .map_err(|e| UseCaseError::MalformedChannels(reminder_id.clone(), e.to_string()))?;

        let successor = if self.reminder.recurrence.is_recurring() {
            let successor = self
                .reminder
                .successor(now)
                .map_err(|e| UseCaseError::InvalidRecurrence(reminder_id.clone(), e.to_string()))?;
            Some(successor)
        } else {
            None
        };

        match ctx
            .repos
            .reminders
            .mark_sent(&reminder_id, now, successor.as_ref())
            .await
        {
            Ok(MarkSentResult::Sent) => (),
            Ok(MarkSentResult::NotPending(_)) => {
                return Err(UseCaseError::ProcessedConcurrently(reminder_id))
            }
            Ok(MarkSentResult::NotFound) => return Err(UseCaseError::NotFound(reminder_id)),
            Err(e) => {
                error!("Unable to mark reminder {} as sent: {:?}", reminder_id, e);
                return Err(UseCaseError::StorageError);
            }
        }

        let notifications = self.notify(&channels, ctx).await;

        let mut reminder = self.reminder.clone();
        reminder.status = ReminderStatus::Sent;
        reminder.updated_at = now;

        Ok(UseCaseRes {
            reminder,
            successor,
            notifications,
        })
    }
}
