use crate::{
    error::WeddingError,
    shared::usecase::{execute, UseCase},
};
use actix_web::{web, HttpResponse};
use wedding_planner_api_structs::get_reminder::*;
use wedding_planner_domain::{Reminder, ID};
use wedding_planner_infra::WeddingContext;

pub async fn get_reminder_controller(
    path: web::Path<PathParams>,
    ctx: web::Data<WeddingContext>,
) -> Result<HttpResponse, WeddingError> {
    let usecase = GetReminderUseCase {
        reminder_id: path.reminder_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|reminder| HttpResponse::Ok().json(APIResponse::new(reminder)))
        .map_err(WeddingError::from)
}

#[derive(Debug)]
pub struct GetReminderUseCase {
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
impl UseCase for GetReminderUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    const NAME: &'static str = "GetReminder";

    async fn execute(&mut self, ctx: &WeddingContext) -> Result<Self::Response, Self::Error> {
        match ctx.repos.reminders.find(&self.reminder_id).await {
            Ok(Some(reminder)) => Ok(reminder),
            Ok(None) => Err(UseCaseError::NotFound(self.reminder_id.clone())),
            Err(_) => Err(UseCaseError::StorageError),
        }
    }
}
