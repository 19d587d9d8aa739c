use super::{IReminderRepo, MarkSentResult, ReminderQuery, ReminderUpdate};
use crate::repos::shared::inmemory_repo::*;
use chrono::{DateTime, Utc};
use wedding_planner_domain::{Reminder, ReminderStatus, ID};

pub struct InMemoryReminderRepo {
    reminders: std::sync::Mutex<Vec<Reminder>>,
}

impl InMemoryReminderRepo {
    pub fn new() -> Self {
        Self {
            reminders: std::sync::Mutex::new(Vec::new()),
        }
    }
}

impl Default for InMemoryReminderRepo {
    fn default() -> Self {
        Self::new()
    }
}

fn sorted_by_remind_at(mut reminders: Vec<Reminder>) -> Vec<Reminder> {
    // Stable sort keeps insertion order for equal timestamps
    reminders.sort_by_key(|r| r.remind_at);
    reminders
}

#[async_trait::async_trait]
impl IReminderRepo for InMemoryReminderRepo {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()> {
        insert(reminder, &self.reminders);
        Ok(())
    }

    async fn update(
        &self,
        reminder_id: &ID,
        reminder_update: &ReminderUpdate,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Option<Reminder>> {
        Ok(update(reminder_id, &self.reminders, |r| {
            reminder_update.apply(r, now)
        }))
    }

    async fn find(&self, reminder_id: &ID) -> anyhow::Result<Option<Reminder>> {
        Ok(find(reminder_id, &self.reminders))
    }

    async fn find_by(&self, query: &ReminderQuery) -> anyhow::Result<Vec<Reminder>> {
        let reminders = find_by(&self.reminders, |r| query.matches(r));
        Ok(sorted_by_remind_at(reminders))
    }

    async fn find_due(&self, now: DateTime<Utc>) -> anyhow::Result<Vec<Reminder>> {
        let reminders = find_by(&self.reminders, |r| r.is_due(now));
        Ok(sorted_by_remind_at(reminders))
    }

    async fn mark_sent(
        &self,
        reminder_id: &ID,
        now: DateTime<Utc>,
        successor: Option<&Reminder>,
    ) -> anyhow::Result<MarkSentResult> {
        // Check, update and insert under a single lock
        let mut reminders = self.reminders.lock().unwrap();
        let reminder = match reminders.iter_mut().find(|r| r.id == *reminder_id) {
            Some(reminder) => reminder,
            None => return Ok(MarkSentResult::NotFound),
        };
        if reminder.status != ReminderStatus::Pending {
            return Ok(MarkSentResult::NotPending(reminder.status));
        }
        reminder.status = ReminderStatus::Sent;
        reminder.updated_at = now;

        if let Some(successor) = successor {
            reminders.push(successor.clone());
        }
        Ok(MarkSentResult::Sent)
    }

    async fn delete(&self, reminder_id: &ID) -> anyhow::Result<Option<Reminder>> {
        Ok(delete(reminder_id, &self.reminders))
    }
}
