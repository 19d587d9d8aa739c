use chrono::{DateTime, Utc};
use std::{
    sync::{Arc, Mutex},
    time::Duration,
};
use wedding_planner_domain::{NewReminder, Reminder, ReminderType, ID};
use wedding_planner_infra::{INotifier, StaticTimeSys, WeddingContext};

#[derive(Debug, Clone, PartialEq)]
pub struct SentNotification {
    pub destination: String,
    pub subject: String,
    pub body: String,
}

#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<SentNotification>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<SentNotification> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl INotifier for RecordingNotifier {
    async fn send(&self, destination: &str, subject: &str, body: &str) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push(SentNotification {
            destination: destination.into(),
            subject: subject.into(),
            body: body.into(),
        });
        Ok(())
    }
}

pub struct FailingNotifier;

#[async_trait::async_trait]
impl INotifier for FailingNotifier {
    async fn send(&self, _: &str, _: &str, _: &str) -> anyhow::Result<()> {
        Err(anyhow::anyhow!("Provider rejected the email"))
    }
}

pub struct SlowNotifier(pub Duration);

#[async_trait::async_trait]
impl INotifier for SlowNotifier {
    async fn send(&self, _: &str, _: &str, _: &str) -> anyhow::Result<()> {
        actix_web::rt::time::sleep(self.0).await;
        Ok(())
    }
}

pub fn setup_context(now: DateTime<Utc>, notifier: Arc<dyn INotifier>) -> WeddingContext {
    let mut ctx = WeddingContext::create_inmemory();
    ctx.sys = Arc::new(StaticTimeSys(now));
    ctx.notifier = notifier;
    ctx
}

pub fn reminder_factory(remind_at: DateTime<Utc>) -> Reminder {
    let params = NewReminder {
        task_id: Some(ID::new()),
        vendor_id: None,
        title: "Confirm the caterer".into(),
        message: None,
        reminder_type: ReminderType::FollowUp,
        remind_at,
        recurrence: None,
        notification_channels: vec!["email".into()],
        status: None,
    };
    Reminder::new(params, remind_at - chrono::Duration::days(30)).unwrap()
}

pub async fn insert(ctx: &WeddingContext, reminder: &Reminder) {
    ctx.repos.reminders.insert(reminder).await.unwrap();
}
