use crate::dtos::ReminderDTO;
use serde::{Deserialize, Serialize};
use wedding_planner_domain::{Reminder, ID};

pub type ReminderResponse = ReminderDTO;

#[derive(Debug, Deserialize, Serialize)]
pub struct RemindersResponse(pub Vec<ReminderDTO>);

impl RemindersResponse {
    pub fn new(reminders: Vec<Reminder>) -> Self {
        Self(reminders.into_iter().map(ReminderDTO::new).collect())
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new<T: Into<String>>(message: T) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub mod get_reminders {
    use super::*;

    /// Enum filters are kept as strings so that invalid values can be
    /// reported together with the valid ones
    #[derive(Deserialize, Serialize, Default)]
    pub struct QueryParams {
        #[serde(default)]
        pub status: Option<String>,
        #[serde(default)]
        pub reminder_type: Option<String>,
        #[serde(default)]
        pub task_id: Option<ID>,
        #[serde(default)]
        pub vendor_id: Option<ID>,
    }

    pub type APIResponse = RemindersResponse;
}

pub mod get_due_reminders {
    use super::*;

    pub type APIResponse = RemindersResponse;
}

pub mod get_reminder {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub reminder_id: ID,
    }

    pub type APIResponse = ReminderResponse;
}

pub mod create_reminder {
    use super::*;
    use chrono::{DateTime, Utc};

    #[derive(Deserialize, Serialize)]
    pub struct RequestBody {
        #[serde(default)]
        pub task_id: Option<ID>,
        #[serde(default)]
        pub vendor_id: Option<ID>,
        pub title: String,
        #[serde(default)]
        pub message: Option<String>,
        pub reminder_type: String,
        pub remind_at: DateTime<Utc>,
        #[serde(default)]
        pub recurrence: Option<String>,
        pub notification_channels: Vec<String>,
        #[serde(default)]
        pub status: Option<String>,
    }

    pub type APIResponse = ReminderResponse;
}

pub mod update_reminder {
    use super::*;
    use chrono::{DateTime, Utc};

    #[derive(Deserialize)]
    pub struct PathParams {
        pub reminder_id: ID,
    }

    #[derive(Deserialize, Serialize, Default)]
    pub struct RequestBody {
        #[serde(default)]
        pub task_id: Option<ID>,
        #[serde(default)]
        pub vendor_id: Option<ID>,
        #[serde(default)]
        pub title: Option<String>,
        #[serde(default)]
        pub message: Option<String>,
        #[serde(default)]
        pub reminder_type: Option<String>,
        #[serde(default)]
        pub remind_at: Option<DateTime<Utc>>,
        #[serde(default)]
        pub recurrence: Option<String>,
        #[serde(default)]
        pub notification_channels: Option<Vec<String>>,
        #[serde(default)]
        pub status: Option<String>,
    }

    pub type APIResponse = ReminderResponse;
}

pub mod delete_reminder {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub reminder_id: ID,
    }

    pub type APIResponse = MessageResponse;
}

pub mod process_reminder {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub reminder_id: ID,
    }

    #[derive(Deserialize, Serialize, Default)]
    pub struct QueryParams {
        /// Destination of email notifications
        #[serde(default)]
        pub email: Option<String>,
    }

    pub type APIResponse = MessageResponse;
}
