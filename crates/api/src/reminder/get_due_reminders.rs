use crate::{
    error::WeddingError,
    shared::usecase::{execute, UseCase},
};
use actix_web::{web, HttpResponse};
use wedding_planner_api_structs::get_due_reminders::*;
use wedding_planner_domain::Reminder;
use wedding_planner_infra::WeddingContext;

pub async fn get_due_reminders_controller(
    ctx: web::Data<WeddingContext>,
) -> Result<HttpResponse, WeddingError> {
    execute(GetDueRemindersUseCase, &ctx)
        .await
        .map(|reminders| HttpResponse::Ok().json(APIResponse::new(reminders)))
        .map_err(WeddingError::from)
}

/// Pending reminders whose `remind_at` has passed, earliest first
#[derive(Debug)]
pub struct GetDueRemindersUseCase;

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

impl From<UseCaseError> for WeddingError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetDueRemindersUseCase {
    type Response = Vec<Reminder>;

    type Error = UseCaseError;

    const NAME: &'static str = "GetDueReminders";

    async fn execute(&mut self, ctx: &WeddingContext) -> Result<Self::Response, Self::Error> {
        ctx.repos
            .reminders
            .find_due(ctx.sys.now())
            .await
            .map_err(|_| UseCaseError::StorageError)
    }
}
