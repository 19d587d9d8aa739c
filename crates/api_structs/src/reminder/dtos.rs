use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use wedding_planner_domain::{Recurrence, Reminder, ReminderStatus, ReminderType, ID};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ReminderDTO {
    pub id: ID,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<ID>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_id: Option<ID>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub reminder_type: ReminderType,
    pub remind_at: DateTime<Utc>,
    pub recurrence: Recurrence,
    /// JSON array of channel names, as stored
    pub notification_channels: String,
    pub status: ReminderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReminderDTO {
    pub fn new(reminder: Reminder) -> Self {
        Self {
            id: reminder.id,
            task_id: reminder.task_id,
            vendor_id: reminder.vendor_id,
            title: reminder.title,
            message: reminder.message,
            reminder_type: reminder.reminder_type,
            remind_at: reminder.remind_at,
            recurrence: reminder.recurrence,
            notification_channels: reminder.notification_channels.as_str().to_string(),
            status: reminder.status,
            created_at: reminder.created_at,
            updated_at: reminder.updated_at,
        }
    }
}
