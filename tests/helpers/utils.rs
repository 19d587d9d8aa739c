use chrono::{DateTime, Duration, Utc};
use wedding_planner_sdk::{CreateReminderInput, ReminderType, ID};

pub fn create_reminder_input(remind_at: DateTime<Utc>) -> CreateReminderInput {
    CreateReminderInput {
        task_id: Some(ID::new()),
        vendor_id: None,
        title: "Order the wedding cake".into(),
        message: None,
        reminder_type: ReminderType::Deadline,
        remind_at,
        recurrence: None,
        notification_channels: vec!["email".into()],
        status: None,
    }
}

pub fn an_hour_ago() -> DateTime<Utc> {
    Utc::now() - Duration::hours(1)
}

pub fn in_a_week() -> DateTime<Utc> {
    Utc::now() + Duration::days(7)
}
