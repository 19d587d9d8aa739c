mod inmemory;
mod postgres;

use chrono::{DateTime, Utc};
pub use inmemory::InMemoryReminderRepo;
pub use postgres::PostgresReminderRepo;
use wedding_planner_domain::{
    NotificationChannels, Recurrence, Reminder, ReminderStatus, ReminderType, ID,
};

/// Optional filters when listing `Reminder`s. Unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct ReminderQuery {
    pub status: Option<ReminderStatus>,
    pub reminder_type: Option<ReminderType>,
    pub task_id: Option<ID>,
    pub vendor_id: Option<ID>,
}

impl ReminderQuery {
    pub fn matches(&self, reminder: &Reminder) -> bool {
        self.status.map_or(true, |s| reminder.status == s)
            && self.reminder_type.map_or(true, |t| reminder.reminder_type == t)
            && self
                .task_id
                .as_ref()
                .map_or(true, |id| reminder.task_id.as_ref() == Some(id))
            && self
                .vendor_id
                .as_ref()
                .map_or(true, |id| reminder.vendor_id.as_ref() == Some(id))
    }
}

/// The columns a partial update writes. Unset fields keep their stored value,
/// so an update never reverts a concurrent status transition it did not ask for.
#[derive(Debug, Clone, Default)]
pub struct ReminderUpdate {
    pub task_id: Option<ID>,
    pub vendor_id: Option<ID>,
    pub title: Option<String>,
    pub message: Option<String>,
    pub reminder_type: Option<ReminderType>,
    pub remind_at: Option<DateTime<Utc>>,
    pub recurrence: Option<Recurrence>,
    pub notification_channels: Option<NotificationChannels>,
    pub status: Option<ReminderStatus>,
}

impl ReminderUpdate {
    pub fn apply(&self, reminder: &mut Reminder, now: DateTime<Utc>) {
        if let Some(task_id) = &self.task_id {
            reminder.task_id = Some(task_id.clone());
        }
        if let Some(vendor_id) = &self.vendor_id {
            reminder.vendor_id = Some(vendor_id.clone());
        }
        if let Some(title) = &self.title {
            reminder.title = title.clone();
        }
        if let Some(message) = &self.message {
            reminder.message = Some(message.clone());
        }
        if let Some(reminder_type) = self.reminder_type {
            reminder.reminder_type = reminder_type;
        }
        if let Some(remind_at) = self.remind_at {
            reminder.remind_at = remind_at;
        }
        if let Some(recurrence) = self.recurrence {
            reminder.recurrence = recurrence;
        }
        if let Some(channels) = &self.notification_channels {
            reminder.notification_channels = channels.clone();
        }
        if let Some(status) = self.status {
            reminder.status = status;
        }
        reminder.updated_at = now;
    }
}

/// Outcome of the conditional `pending -> sent` transition
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarkSentResult {
    Sent,
    /// The reminder exists but was not `Pending`. Nothing was written.
    NotPending(ReminderStatus),
    NotFound,
}

#[async_trait::async_trait]
pub trait IReminderRepo: Send + Sync {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()>;
    /// Writes only the fields set in `update` in a single statement and
    /// returns the stored result, or `None` when the reminder does not exist
    async fn update(
        &self,
        reminder_id: &ID,
        update: &ReminderUpdate,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Option<Reminder>>;
    async fn find(&self, reminder_id: &ID) -> anyhow::Result<Option<Reminder>>;
    /// Ordered by `remind_at`, earliest first
    async fn find_by(&self, query: &ReminderQuery) -> anyhow::Result<Vec<Reminder>>;
    /// All `Pending` reminders with `remind_at <= now`, earliest first.
    /// Reminders with the same `remind_at` keep their insertion order.
    async fn find_due(&self, now: DateTime<Utc>) -> anyhow::Result<Vec<Reminder>>;
    /// Atomically sets the status to `Sent` only if it is currently `Pending`.
    /// When the transition happens the `successor` is inserted as part of the
    /// same write, so either both are stored or neither is.
    async fn mark_sent(
        &self,
        reminder_id: &ID,
        now: DateTime<Utc>,
        successor: Option<&Reminder>,
    ) -> anyhow::Result<MarkSentResult>;
    async fn delete(&self, reminder_id: &ID) -> anyhow::Result<Option<Reminder>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Repos;
    use chrono::TimeZone;
    use wedding_planner_domain::NewReminder;

    fn at(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, d, h, 0, 0).unwrap()
    }

    fn reminder_factory(remind_at: DateTime<Utc>, status: ReminderStatus) -> Reminder {
        let params = NewReminder {
            task_id: Some(ID::new()),
            vendor_id: None,
            title: "Send invitations".into(),
            message: None,
            reminder_type: ReminderType::Deadline,
            remind_at,
            recurrence: None,
            notification_channels: vec!["email".into()],
            status: Some(status),
        };
        Reminder::new(params, at(1, 0)).unwrap()
    }

    async fn crud(repo: &dyn IReminderRepo) {
        let mut reminder = reminder_factory(at(2, 8), ReminderStatus::Pending);

        // Insert
        assert!(repo.insert(&reminder).await.is_ok());
        let res = repo.find(&reminder.id).await.unwrap().unwrap();
        assert_eq!(res, reminder);

        // Update
        let update = ReminderUpdate {
            title: Some("Send save the dates".into()),
            recurrence: Some(Recurrence::Monthly),
            ..Default::default()
        };
        let res = repo.update(&reminder.id, &update, at(1, 12)).await.unwrap();
        reminder.title = "Send save the dates".into();
        reminder.recurrence = Recurrence::Monthly;
        reminder.updated_at = at(1, 12);
        assert_eq!(res.as_ref(), Some(&reminder));
        assert_eq!(repo.find(&reminder.id).await.unwrap(), Some(reminder.clone()));
        let res = repo.update(&ID::new(), &update, at(1, 12)).await.unwrap();
        assert!(res.is_none());

        // Delete
        let res = repo.delete(&reminder.id).await.unwrap();
        assert_eq!(res.map(|r| r.id), Some(reminder.id.clone()));
        assert!(repo.find(&reminder.id).await.unwrap().is_none());
        assert!(repo.delete(&reminder.id).await.unwrap().is_none());
    }

    /// Ids of `reminders` which belong to `own`, in order. Keeps the shared
    /// tests independent of rows left behind by other runs.
    fn own_ids(reminders: Vec<Reminder>, own: &[&Reminder]) -> Vec<ID> {
        reminders
            .into_iter()
            .map(|r| r.id)
            .filter(|id| own.iter().any(|o| o.id == *id))
            .collect()
    }

    async fn due(repo: &dyn IReminderRepo) {
        let late = reminder_factory(at(1, 9), ReminderStatus::Pending);
        let early = reminder_factory(at(1, 7), ReminderStatus::Pending);
        let tie = reminder_factory(at(1, 9), ReminderStatus::Pending);
        let exactly_now = reminder_factory(at(1, 10), ReminderStatus::Pending);
        let future = reminder_factory(at(1, 11), ReminderStatus::Pending);
        let sent = reminder_factory(at(1, 6), ReminderStatus::Sent);
        let snoozed = reminder_factory(at(1, 6), ReminderStatus::Snoozed);
        let own = [&late, &early, &tie, &exactly_now, &future, &sent, &snoozed];
        for r in own {
            repo.insert(r).await.unwrap();
        }

        let due = repo.find_due(at(1, 10)).await.unwrap();
        assert_eq!(
            own_ids(due, &own),
            vec![
                early.id.clone(),
                late.id.clone(),
                tie.id.clone(),
                exactly_now.id.clone()
            ]
        );

        let due = repo.find_due(at(1, 5)).await.unwrap();
        assert!(own_ids(due, &own).is_empty());
    }

    async fn mark_sent(repo: &dyn IReminderRepo) {
        let mut reminder = reminder_factory(at(1, 9), ReminderStatus::Pending);
        reminder.recurrence = Recurrence::Daily;
        repo.insert(&reminder).await.unwrap();
        let successor = reminder.successor(at(1, 10)).unwrap();

        let res = repo
            .mark_sent(&reminder.id, at(1, 10), Some(&successor))
            .await
            .unwrap();
        assert_eq!(res, MarkSentResult::Sent);
        let stored = repo.find(&reminder.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ReminderStatus::Sent);
        assert_eq!(stored.updated_at, at(1, 10));
        assert_eq!(repo.find(&successor.id).await.unwrap(), Some(successor));

        // Second transition loses and writes nothing
        let another = reminder.successor(at(1, 11)).unwrap();
        let res = repo
            .mark_sent(&reminder.id, at(1, 11), Some(&another))
            .await
            .unwrap();
        assert_eq!(res, MarkSentResult::NotPending(ReminderStatus::Sent));
        assert!(repo.find(&another.id).await.unwrap().is_none());
        let stored = repo.find(&reminder.id).await.unwrap().unwrap();
        assert_eq!(stored.updated_at, at(1, 10));

        let res = repo.mark_sent(&ID::new(), at(1, 11), None).await.unwrap();
        assert_eq!(res, MarkSentResult::NotFound);
    }

    async fn update_keeps_unset_status(repo: &dyn IReminderRepo) {
        let reminder = reminder_factory(at(1, 9), ReminderStatus::Pending);
        repo.insert(&reminder).await.unwrap();
        repo.mark_sent(&reminder.id, at(1, 10), None).await.unwrap();

        // A rename which does not mention the status must not make it due again
        let update = ReminderUpdate {
            title: Some("Send thank you cards".into()),
            ..Default::default()
        };
        let res = repo
            .update(&reminder.id, &update, at(1, 11))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(res.status, ReminderStatus::Sent);
        assert_eq!(res.title, "Send thank you cards");
        let due = repo.find_due(at(1, 12)).await.unwrap();
        assert!(own_ids(due, &[&reminder]).is_empty());
    }

    async fn failed_successor_keeps_reminder_pending(repo: &dyn IReminderRepo) {
        let mut reminder = reminder_factory(at(1, 9), ReminderStatus::Pending);
        reminder.recurrence = Recurrence::Weekly;
        let existing = reminder_factory(at(8, 9), ReminderStatus::Pending);
        repo.insert(&reminder).await.unwrap();
        repo.insert(&existing).await.unwrap();

        // The successor collides with an existing primary key
        let mut successor = reminder.successor(at(1, 10)).unwrap();
        successor.id = existing.id.clone();
        assert!(repo
            .mark_sent(&reminder.id, at(1, 10), Some(&successor))
            .await
            .is_err());

        let stored = repo.find(&reminder.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ReminderStatus::Pending);
        assert_eq!(stored.updated_at, reminder.updated_at);
        let due = repo.find_due(at(1, 10)).await.unwrap();
        assert_eq!(own_ids(due, &[&reminder]), vec![reminder.id.clone()]);
    }

    async fn filters(repo: &dyn IReminderRepo) {
        let vendor_id = ID::new();
        let mut payment = reminder_factory(at(5, 9), ReminderStatus::Pending);
        payment.reminder_type = ReminderType::PaymentDue;
        payment.task_id = None;
        payment.vendor_id = Some(vendor_id.clone());
        let meeting = reminder_factory(at(4, 9), ReminderStatus::Dismissed);
        repo.insert(&payment).await.unwrap();
        repo.insert(&meeting).await.unwrap();
        let own = [&payment, &meeting];

        let all = repo.find_by(&ReminderQuery::default()).await.unwrap();
        assert_eq!(
            own_ids(all, &own),
            vec![meeting.id.clone(), payment.id.clone()]
        );

        let query = ReminderQuery {
            vendor_id: Some(vendor_id),
            ..Default::default()
        };
        let res = repo.find_by(&query).await.unwrap();
        assert_eq!(res.len(), 1);
        assert_eq!(res[0].id, payment.id);

        let query = ReminderQuery {
            status: Some(ReminderStatus::Dismissed),
            task_id: meeting.task_id.clone(),
            ..Default::default()
        };
        let res = repo.find_by(&query).await.unwrap();
        assert_eq!(res.len(), 1);
        assert_eq!(res[0].id, meeting.id);

        let query = ReminderQuery {
            status: Some(ReminderStatus::Pending),
            reminder_type: Some(ReminderType::PaymentDue),
            ..Default::default()
        };
        let res = repo.find_by(&query).await.unwrap();
        assert_eq!(own_ids(res, &own), vec![payment.id.clone()]);

        let query = ReminderQuery {
            reminder_type: Some(ReminderType::Custom),
            ..Default::default()
        };
        let res = repo.find_by(&query).await.unwrap();
        assert!(own_ids(res, &own).is_empty());
    }

    #[tokio::test]
    async fn inmemory_reminder_repo() {
        crud(Repos::create_inmemory().reminders.as_ref()).await;
        due(Repos::create_inmemory().reminders.as_ref()).await;
        mark_sent(Repos::create_inmemory().reminders.as_ref()).await;
        update_keeps_unset_status(Repos::create_inmemory().reminders.as_ref()).await;
        filters(Repos::create_inmemory().reminders.as_ref()).await;
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL pointing to a postgres database"]
    async fn postgres_reminder_repo() {
        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL to be set");
        let repos = Repos::create_postgres(&database_url)
            .await
            .expect("To connect to postgres");
        let repo = repos.reminders.as_ref();
        crud(repo).await;
        due(repo).await;
        mark_sent(repo).await;
        update_keeps_unset_status(repo).await;
        failed_successor_keeps_reminder_pending(repo).await;
        filters(repo).await;
    }
}
