use super::parse_variant;
use crate::{
    error::WeddingError,
    shared::usecase::{execute, UseCase},
};
use actix_web::{web, HttpResponse};
use wedding_planner_api_structs::get_reminders::*;
use wedding_planner_domain::Reminder;
use wedding_planner_infra::{ReminderQuery, WeddingContext};

pub async fn get_reminders_controller(
    query: web::Query<QueryParams>,
    ctx: web::Data<WeddingContext>,
) -> Result<HttpResponse, WeddingError> {
    let query = query.into_inner();

    let usecase = GetRemindersUseCase {
        query: ReminderQuery {
            status: parse_variant(query.status.as_deref())?,
            reminder_type: parse_variant(query.reminder_type.as_deref())?,
            task_id: query.task_id,
            vendor_id: query.vendor_id,
        },
    };

    execute(usecase, &ctx)
        .await
        .map(|reminders| HttpResponse::Ok().json(APIResponse::new(reminders)))
        .map_err(WeddingError::from)
}

#[derive(Debug)]
pub struct GetRemindersUseCase {
    pub query: ReminderQuery,
}

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
impl UseCase for GetRemindersUseCase {
    type Response = Vec<Reminder>;

    type Error = UseCaseError;

    const NAME: &'static str = "GetReminders";

    async fn execute(&mut self, ctx: &WeddingContext) -> Result<Self::Response, Self::Error> {
        ctx.repos
            .reminders
            .find_by(&self.query)
            .await
            .map_err(|_| UseCaseError::StorageError)
    }
}
