use super::parse_variant;
use crate::{
    error::WeddingError,
    shared::usecase::{execute, UseCase},
};
use actix_web::{web, HttpResponse};
use wedding_planner_api_structs::create_reminder::*;
use wedding_planner_domain::{InvalidReminderError, NewReminder, Reminder, ReminderType};
use wedding_planner_infra::WeddingContext;

pub async fn create_reminder_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<WeddingContext>,
) -> Result<HttpResponse, WeddingError> {
    let body = body.into_inner();
    let reminder_type = body
        .reminder_type
        .parse::<ReminderType>()
        .map_err(|e| WeddingError::BadClientData(e.to_string()))?;

    let usecase = CreateReminderUseCase {
        reminder: NewReminder {
            task_id: body.task_id,
            vendor_id: body.vendor_id,
            title: body.title,
            message: body.message,
            reminder_type,
            remind_at: body.remind_at,
            recurrence: parse_variant(body.recurrence.as_deref())?,
            notification_channels: body.notification_channels,
            status: parse_variant(body.status.as_deref())?,
        },
    };

    execute(usecase, &ctx)
        .await
        .map(|reminder| HttpResponse::Created().json(APIResponse::new(reminder)))
        .map_err(WeddingError::from)
}

#[derive(Debug)]
pub struct CreateReminderUseCase {
    pub reminder: NewReminder,
}

#[derive(Debug)]
pub enum UseCaseError {
    InvalidReminder(InvalidReminderError),
    StorageError,
}

impl From<UseCaseError> for WeddingError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidReminder(e) => Self::BadClientData(e.to_string()),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateReminderUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateReminder";

    async fn execute(&mut self, ctx: &WeddingContext) -> Result<Self::Response, Self::Error> {
        let reminder = Reminder::new(self.reminder.clone(), ctx.sys.now())
            .map_err(UseCaseError::InvalidReminder)?;

        ctx.repos
            .reminders
            .insert(&reminder)
            .await
            .map(|_| reminder)
            .map_err(|_| UseCaseError::StorageError)
    }
}
