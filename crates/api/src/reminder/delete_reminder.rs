use crate::{
    error::WeddingError,
    shared::usecase::{execute, UseCase},
};
use actix_web::{web, HttpResponse};
use wedding_planner_api_structs::delete_reminder::*;
use wedding_planner_domain::{Reminder, ID};
use wedding_planner_infra::WeddingContext;

pub async fn delete_reminder_controller(
    path: web::Path<PathParams>,
    ctx: web::Data<WeddingContext>,
) -> Result<HttpResponse, WeddingError> {
    let usecase = DeleteReminderUseCase {
        reminder_id: path.reminder_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|_| HttpResponse::Ok().json(APIResponse::new("Reminder deleted successfully")))
        .map_err(WeddingError::from)
}

/// Removes a single `Reminder`. Other reminders of the same recurrence
/// chain are independent rows and are kept.
#[derive(Debug)]
pub struct DeleteReminderUseCase {
    pub reminder_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
    StorageError,
}

impl From<UseCaseError> for WeddingError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(_) => Self::NotFound("Reminder not found".into()),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeleteReminderUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    const NAME: &'static str = "DeleteReminder";

    async fn execute(&mut self, ctx: &WeddingContext) -> Result<Self::Response, Self::Error> {
        match ctx.repos.reminders.delete(&self.reminder_id).await {
            Ok(Some(reminder)) => Ok(reminder),
            Ok(None) => Err(UseCaseError::NotFound(self.reminder_id.clone())),
            Err(_) => Err(UseCaseError::StorageError),
        }
    }
}
