use crate::{APIResponse, BaseClient};
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use std::sync::Arc;
use wedding_planner_api_structs::*;
use wedding_planner_domain::{Recurrence, ReminderStatus, ReminderType, ID};

#[derive(Clone)]
pub struct ReminderClient {
    base: Arc<BaseClient>,
}

pub struct CreateReminderInput {
    pub task_id: Option<ID>,
    pub vendor_id: Option<ID>,
    pub title: String,
    pub message: Option<String>,
    pub reminder_type: ReminderType,
    pub remind_at: DateTime<Utc>,
    pub recurrence: Option<Recurrence>,
    pub notification_channels: Vec<String>,
    pub status: Option<ReminderStatus>,
}

#[derive(Default)]
pub struct UpdateReminderInput {
    pub reminder_id: ID,
    pub task_id: Option<ID>,
    pub vendor_id: Option<ID>,
    pub title: Option<String>,
    pub message: Option<String>,
    pub reminder_type: Option<ReminderType>,
    pub remind_at: Option<DateTime<Utc>>,
    pub recurrence: Option<Recurrence>,
    pub notification_channels: Option<Vec<String>>,
    pub status: Option<ReminderStatus>,
}

#[derive(Default)]
pub struct GetRemindersInput {
    pub status: Option<ReminderStatus>,
    pub reminder_type: Option<ReminderType>,
    pub task_id: Option<ID>,
    pub vendor_id: Option<ID>,
}

pub struct ProcessReminderInput {
    pub reminder_id: ID,
    /// Email address which receives the `email` channel notifications
    pub email: Option<String>,
}

impl ReminderClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn create(
        &self,
        input: CreateReminderInput,
    ) -> APIResponse<create_reminder::APIResponse> {
        let body = create_reminder::RequestBody {
            task_id: input.task_id,
            vendor_id: input.vendor_id,
            title: input.title,
            message: input.message,
            reminder_type: input.reminder_type.to_string(),
            remind_at: input.remind_at,
            recurrence: input.recurrence.map(|r| r.to_string()),
            notification_channels: input.notification_channels,
            status: input.status.map(|s| s.to_string()),
        };
        self.base
            .post(body, "reminders".into(), StatusCode::CREATED)
            .await
    }

    pub async fn get(&self, reminder_id: ID) -> APIResponse<get_reminder::APIResponse> {
        self.base
            .get(format!("reminders/{}", reminder_id), StatusCode::OK)
            .await
    }

    pub async fn list(&self, input: GetRemindersInput) -> APIResponse<get_reminders::APIResponse> {
        let query = get_reminders::QueryParams {
            status: input.status.map(|s| s.to_string()),
            reminder_type: input.reminder_type.map(|t| t.to_string()),
            task_id: input.task_id,
            vendor_id: input.vendor_id,
        };
        self.base
            .get_with_query(&query, "reminders".into(), StatusCode::OK)
            .await
    }

    pub async fn due(&self) -> APIResponse<get_due_reminders::APIResponse> {
        self.base.get("reminders/due".into(), StatusCode::OK).await
    }

    pub async fn update(
        &self,
        input: UpdateReminderInput,
    ) -> APIResponse<update_reminder::APIResponse> {
        let body = update_reminder::RequestBody {
            task_id: input.task_id,
            vendor_id: input.vendor_id,
            title: input.title,
            message: input.message,
            reminder_type: input.reminder_type.map(|t| t.to_string()),
            remind_at: input.remind_at,
            recurrence: input.recurrence.map(|r| r.to_string()),
            notification_channels: input.notification_channels,
            status: input.status.map(|s| s.to_string()),
        };
        self.base
            .put(
                body,
                format!("reminders/{}", input.reminder_id),
                StatusCode::OK,
            )
            .await
    }

    pub async fn delete(&self, reminder_id: ID) -> APIResponse<delete_reminder::APIResponse> {
        self.base
            .delete(format!("reminders/{}", reminder_id), StatusCode::OK)
            .await
    }

    pub async fn process(
        &self,
        input: ProcessReminderInput,
    ) -> APIResponse<process_reminder::APIResponse> {
        let query = process_reminder::QueryParams { email: input.email };
        self.base
            .post_with_query(
                &query,
                format!("reminders/{}/process", input.reminder_id),
                StatusCode::OK,
            )
            .await
    }
}
