mod base;
mod reminder;
mod status;

pub(crate) use base::BaseClient;
pub use base::{APIError, APIResponse};
pub use reminder::{
    CreateReminderInput, GetRemindersInput, ProcessReminderInput, ReminderClient,
    UpdateReminderInput,
};
use status::StatusClient;
use std::sync::Arc;
pub use wedding_planner_api_structs::dtos::*;
pub use wedding_planner_api_structs::MessageResponse;
pub use wedding_planner_domain::{Recurrence, ReminderStatus, ReminderType, ID};

// Domain
pub use wedding_planner_api_structs::dtos::ReminderDTO as Reminder;

/// Wedding Planner Server SDK
///
/// The SDK contains methods for interacting with the Wedding Planner server
/// API.
#[derive(Clone)]
pub struct WeddingPlannerSDK {
    pub reminder: ReminderClient,
    pub status: StatusClient,
}

impl WeddingPlannerSDK {
    pub fn new(address: String) -> Self {
        let base = Arc::new(BaseClient::new(address));
        let reminder = ReminderClient::new(base.clone());
        let status = StatusClient::new(base);

        Self { reminder, status }
    }
}
