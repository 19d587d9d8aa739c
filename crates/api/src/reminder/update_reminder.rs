use super::parse_variant;
use crate::{
    error::WeddingError,
    shared::usecase::{execute, UseCase},
};
use actix_web::{web, HttpResponse};
use wedding_planner_api_structs::update_reminder::*;
use wedding_planner_domain::{NotificationChannels, Reminder, ID};
use wedding_planner_infra::{ReminderUpdate, WeddingContext};

pub async fn update_reminder_controller(
    path: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<WeddingContext>,
) -> Result<HttpResponse, WeddingError> {
    let body = body.into_inner();

    let usecase = UpdateReminderUseCase {
        reminder_id: path.reminder_id.clone(),
        update: ReminderUpdate {
            task_id: body.task_id,
            vendor_id: body.vendor_id,
            title: body.title,
            message: body.message,
            reminder_type: parse_variant(body.reminder_type.as_deref())?,
            remind_at: body.remind_at,
            recurrence: parse_variant(body.recurrence.as_deref())?,
            notification_channels: body
                .notification_channels
                .map(|channels| NotificationChannels::encode(&channels)),
            status: parse_variant(body.status.as_deref())?,
        },
    };

    execute(usecase, &ctx)
        .await
        .map(|reminder| HttpResponse::Ok().json(APIResponse::new(reminder)))
        .map_err(WeddingError::from)
}

/// Partial update of a `Reminder`. Only the fields which are set are written,
/// everything else keeps its stored value.
#[derive(Debug)]
pub struct UpdateReminderUseCase {
    pub reminder_id: ID,
    pub update: ReminderUpdate,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
    EmptyTitle,
    StorageError,
}

impl From<UseCaseError> for WeddingError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(_) => Self::NotFound("Reminder not found".into()),
            UseCaseError::EmptyTitle => {
                Self::BadClientData("A reminder must have a non empty title".into())
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for UpdateReminderUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    const NAME: &'static str = "UpdateReminder";

    async fn execute(&mut self, ctx: &WeddingContext) -> Result<Self::Response, Self::Error> {
        if matches!(&self.update.title, Some(title) if title.trim().is_empty()) {
            return Err(UseCaseError::EmptyTitle);
        }

        match ctx
            .repos
            .reminders
            .update(&self.reminder_id, &self.update, ctx.sys.now())
            .await
        {
            Ok(Some(reminder)) => Ok(reminder),
            Ok(None) => Err(UseCaseError::NotFound(self.reminder_id.clone())),
            Err(_) => Err(UseCaseError::StorageError),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::reminder::{test_utils::*, ProcessReminderUseCase};
    use chrono::{DateTime, TimeZone, Utc};
    use std::sync::Arc;
    use wedding_planner_domain::{Recurrence, ReminderStatus};
    use wedding_planner_infra::{IReminderRepo, MarkSentResult, ReminderQuery};

    /// Processes the reminder right before the update is written, as a
    /// concurrent `ProcessReminder` call committing first would
    struct ProcessedBeforeUpdateRepo {
        inner: Arc<dyn IReminderRepo>,
    }

    #[async_trait::async_trait]
    impl IReminderRepo for ProcessedBeforeUpdateRepo {
        async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()> {
            self.inner.insert(reminder).await
        }

        async fn update(
            &self,
            reminder_id: &ID,
            update: &ReminderUpdate,
            now: DateTime<Utc>,
        ) -> anyhow::Result<Option<Reminder>> {
            if let Some(reminder) = self.inner.find(reminder_id).await? {
                let successor = reminder.successor(now)?;
                self.inner
                    .mark_sent(reminder_id, now, Some(&successor))
                    .await?;
            }
            self.inner.update(reminder_id, update, now).await
        }

        async fn find(&self, reminder_id: &ID) -> anyhow::Result<Option<Reminder>> {
            self.inner.find(reminder_id).await
        }

        async fn find_by(&self, query: &ReminderQuery) -> anyhow::Result<Vec<Reminder>> {
            self.inner.find_by(query).await
        }

        async fn find_due(&self, now: DateTime<Utc>) -> anyhow::Result<Vec<Reminder>> {
            self.inner.find_due(now).await
        }

        async fn mark_sent(
            &self,
            reminder_id: &ID,
            now: DateTime<Utc>,
            successor: Option<&Reminder>,
        ) -> anyhow::Result<MarkSentResult> {
            self.inner.mark_sent(reminder_id, now, successor).await
        }

        async fn delete(&self, reminder_id: &ID) -> anyhow::Result<Option<Reminder>> {
            self.inner.delete(reminder_id).await
        }
    }

    #[actix_web::main]
    #[test]
    async fn updates_only_given_fields() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let ctx = setup_context(now, Arc::new(RecordingNotifier::default()));
        let reminder = reminder_factory(now + chrono::Duration::days(2));
        insert(&ctx, &reminder).await;

        let mut usecase = UpdateReminderUseCase {
            reminder_id: reminder.id.clone(),
            update: ReminderUpdate {
                status: Some(ReminderStatus::Snoozed),
                recurrence: Some(Recurrence::Weekly),
                notification_channels: Some(NotificationChannels::encode(&["browser"])),
                ..Default::default()
            },
        };
        let updated = usecase.execute(&ctx).await.unwrap();
        assert_eq!(updated.status, ReminderStatus::Snoozed);
        assert_eq!(updated.recurrence, Recurrence::Weekly);
        assert_eq!(updated.notification_channels.as_str(), r#"["browser"]"#);
        assert_eq!(updated.title, reminder.title);
        assert_eq!(updated.remind_at, reminder.remind_at);
        assert_eq!(updated.created_at, reminder.created_at);
        assert_eq!(updated.updated_at, now);

        let stored = ctx.repos.reminders.find(&reminder.id).await.unwrap();
        assert_eq!(stored, Some(updated));
    }

    #[actix_web::main]
    #[test]
    async fn rename_racing_with_processing_keeps_it_sent() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let notifier = Arc::new(RecordingNotifier::default());
        let mut ctx = setup_context(now, notifier.clone());
        ctx.repos.reminders = Arc::new(ProcessedBeforeUpdateRepo {
            inner: ctx.repos.reminders.clone(),
        });
        let mut reminder = reminder_factory(now - chrono::Duration::hours(1));
        reminder.recurrence = Recurrence::Daily;
        insert(&ctx, &reminder).await;

        let mut usecase = UpdateReminderUseCase {
            reminder_id: reminder.id.clone(),
            update: ReminderUpdate {
                title: Some("Confirm the caterer menu".into()),
                ..Default::default()
            },
        };
        let updated = usecase.execute(&ctx).await.unwrap();
        assert_eq!(updated.title, "Confirm the caterer menu");
        assert_eq!(updated.status, ReminderStatus::Sent);

        // The renamed reminder is not due again and cannot spawn a second successor
        assert!(ctx.repos.reminders.find_due(now).await.unwrap().is_empty());
        let stored = ctx.repos.reminders.find(&reminder.id).await.unwrap().unwrap();
        let res = execute(
            ProcessReminderUseCase {
                reminder: stored,
                notify_target: Some("couple@example.com".into()),
            },
            &ctx,
        )
        .await;
        assert!(res.is_err());

        let all = ctx
            .repos
            .reminders
            .find_by(&ReminderQuery::default())
            .await
            .unwrap();
        assert_eq!(all.len(), 2);
        assert!(notifier.sent().is_empty());
    }

    #[actix_web::main]
    #[test]
    async fn rejects_blank_title() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let ctx = setup_context(now, Arc::new(RecordingNotifier::default()));
        let reminder = reminder_factory(now);
        insert(&ctx, &reminder).await;

        let mut usecase = UpdateReminderUseCase {
            reminder_id: reminder.id.clone(),
            update: ReminderUpdate {
                title: Some(" ".into()),
                ..Default::default()
            },
        };
        assert!(matches!(
            usecase.execute(&ctx).await,
            Err(UseCaseError::EmptyTitle)
        ));
        let stored = ctx.repos.reminders.find(&reminder.id).await.unwrap();
        assert_eq!(stored, Some(reminder));
    }

    #[actix_web::main]
    #[test]
    async fn unknown_reminder_is_not_found() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let ctx = setup_context(now, Arc::new(RecordingNotifier::default()));

        let mut usecase = UpdateReminderUseCase {
            reminder_id: ID::new(),
            update: ReminderUpdate {
                title: Some("Book the band".into()),
                ..Default::default()
            },
        };
        assert!(matches!(
            usecase.execute(&ctx).await,
            Err(UseCaseError::NotFound(_))
        ));
    }
}
