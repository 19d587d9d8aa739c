use super::{IReminderRepo, MarkSentResult, ReminderQuery, ReminderUpdate};
use chrono::{DateTime, Utc};
use sqlx::{types::Uuid, FromRow, PgExecutor, PgPool};
use wedding_planner_domain::{NotificationChannels, Reminder, ReminderStatus, ID};

pub struct PostgresReminderRepo {
    pool: PgPool,
}

impl PostgresReminderRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ReminderRaw {
    reminder_uid: Uuid,
    task_uid: Option<Uuid>,
    vendor_uid: Option<Uuid>,
    title: String,
    message: Option<String>,
    reminder_type: String,
    remind_at: DateTime<Utc>,
    recurrence: String,
    notification_channels: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ReminderRaw> for Reminder {
    type Error = anyhow::Error;

    fn try_from(raw: ReminderRaw) -> Result<Self, Self::Error> {
        Ok(Reminder {
            id: raw.reminder_uid.into(),
            task_id: raw.task_uid.map(ID::from),
            vendor_id: raw.vendor_uid.map(ID::from),
            title: raw.title,
            message: raw.message,
            reminder_type: raw.reminder_type.parse()?,
            remind_at: raw.remind_at,
            recurrence: raw.recurrence.parse()?,
            notification_channels: NotificationChannels::from_raw(raw.notification_channels),
            status: raw.status.parse()?,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
        })
    }
}

fn into_reminders(rows: Vec<ReminderRaw>) -> anyhow::Result<Vec<Reminder>> {
    rows.into_iter().map(Reminder::try_from).collect()
}

const SELECT_REMINDERS: &str = r#"
    SELECT reminder_uid, task_uid, vendor_uid, title, message, reminder_type,
        remind_at, recurrence, notification_channels, status, created_at, updated_at
    FROM reminders AS r
"#;

async fn insert_reminder<'e, E: PgExecutor<'e>>(
    executor: E,
    reminder: &Reminder,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO reminders
        (reminder_uid, task_uid, vendor_uid, title, message, reminder_type,
            remind_at, recurrence, notification_channels, status, created_at, updated_at)
        VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        "#,
    )
    .bind(reminder.id.inner_ref())
    .bind(reminder.task_id.as_ref().map(|id| *id.inner_ref()))
    .bind(reminder.vendor_id.as_ref().map(|id| *id.inner_ref()))
    .bind(&reminder.title)
    .bind(&reminder.message)
    .bind(reminder.reminder_type.as_str())
    .bind(reminder.remind_at)
    .bind(reminder.recurrence.as_str())
    .bind(reminder.notification_channels.as_str())
    .bind(reminder.status.as_str())
    .bind(reminder.created_at)
    .bind(reminder.updated_at)
    .execute(executor)
    .await?;
    Ok(())
}

#[async_trait::async_trait]
impl IReminderRepo for PostgresReminderRepo {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()> {
        insert_reminder(&self.pool, reminder).await?;
        Ok(())
    }

    async fn update(
        &self,
        reminder_id: &ID,
        update: &ReminderUpdate,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Option<Reminder>> {
        let raw: Option<ReminderRaw> = sqlx::query_as(
            r#"
            UPDATE reminders
            SET task_uid = COALESCE($2, task_uid),
            vendor_uid = COALESCE($3, vendor_uid),
            title = COALESCE($4, title),
            message = COALESCE($5, message),
            reminder_type = COALESCE($6, reminder_type),
            remind_at = COALESCE($7, remind_at),
            recurrence = COALESCE($8, recurrence),
            notification_channels = COALESCE($9, notification_channels),
            status = COALESCE($10, status),
            updated_at = $11
            WHERE reminder_uid = $1
            RETURNING reminder_uid, task_uid, vendor_uid, title, message, reminder_type,
                remind_at, recurrence, notification_channels, status, created_at, updated_at
            "#,
        )
        .bind(reminder_id.inner_ref())
        .bind(update.task_id.as_ref().map(|id| *id.inner_ref()))
        .bind(update.vendor_id.as_ref().map(|id| *id.inner_ref()))
        .bind(&update.title)
        .bind(&update.message)
        .bind(update.reminder_type.map(|t| t.as_str()))
        .bind(update.remind_at)
        .bind(update.recurrence.map(|r| r.as_str()))
        .bind(update.notification_channels.as_ref().map(|c| c.as_str()))
        .bind(update.status.map(|s| s.as_str()))
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;
        raw.map(Reminder::try_from).transpose()
    }

    async fn find(&self, reminder_id: &ID) -> anyhow::Result<Option<Reminder>> {
        let raw: Option<ReminderRaw> =
            sqlx::query_as(&format!("{} WHERE r.reminder_uid = $1", SELECT_REMINDERS))
                .bind(reminder_id.inner_ref())
                .fetch_optional(&self.pool)
                .await?;
        raw.map(Reminder::try_from).transpose()
    }

    async fn find_by(&self, query: &ReminderQuery) -> anyhow::Result<Vec<Reminder>> {
        let rows: Vec<ReminderRaw> = sqlx::query_as(&format!(
            r#"{}
            WHERE ($1::text IS NULL OR r.status = $1)
            AND ($2::text IS NULL OR r.reminder_type = $2)
            AND ($3::uuid IS NULL OR r.task_uid = $3)
            AND ($4::uuid IS NULL OR r.vendor_uid = $4)
            ORDER BY r.remind_at ASC, r.seq ASC
            "#,
            SELECT_REMINDERS
        ))
        .bind(query.status.map(|s| s.as_str()))
        .bind(query.reminder_type.map(|t| t.as_str()))
        .bind(query.task_id.as_ref().map(|id| *id.inner_ref()))
        .bind(query.vendor_id.as_ref().map(|id| *id.inner_ref()))
        .fetch_all(&self.pool)
        .await?;
        into_reminders(rows)
    }

    async fn find_due(&self, now: DateTime<Utc>) -> anyhow::Result<Vec<Reminder>> {
        let rows: Vec<ReminderRaw> = sqlx::query_as(&format!(
            r#"{}
            WHERE r.status = 'pending' AND r.remind_at <= $1
            ORDER BY r.remind_at ASC, r.seq ASC
            "#,
            SELECT_REMINDERS
        ))
        .bind(now)
        .fetch_all(&self.pool)
        .await?;
        into_reminders(rows)
    }

    async fn mark_sent(
        &self,
        reminder_id: &ID,
        now: DateTime<Utc>,
        successor: Option<&Reminder>,
    ) -> anyhow::Result<MarkSentResult> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE reminders
            SET status = 'sent',
            updated_at = $2
            WHERE reminder_uid = $1 AND status = 'pending'
            "#,
        )
        .bind(reminder_id.inner_ref())
        .bind(now)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if updated == 0 {
            tx.rollback().await?;
            let status: Option<String> =
                sqlx::query_scalar("SELECT status FROM reminders WHERE reminder_uid = $1")
                    .bind(reminder_id.inner_ref())
                    .fetch_optional(&self.pool)
                    .await?;
            return Ok(match status {
                Some(status) => MarkSentResult::NotPending(status.parse::<ReminderStatus>()?),
                None => MarkSentResult::NotFound,
            });
        }

        if let Some(successor) = successor {
            insert_reminder(&mut *tx, successor).await?;
        }
        tx.commit().await?;

        Ok(MarkSentResult::Sent)
    }

    async fn delete(&self, reminder_id: &ID) -> anyhow::Result<Option<Reminder>> {
        let raw: Option<ReminderRaw> = sqlx::query_as(
            r#"
            DELETE FROM reminders AS r
            WHERE r.reminder_uid = $1
            RETURNING reminder_uid, task_uid, vendor_uid, title, message, reminder_type,
                remind_at, recurrence, notification_channels, status, created_at, updated_at
            "#,
        )
        .bind(reminder_id.inner_ref())
        .fetch_optional(&self.pool)
        .await?;
        raw.map(Reminder::try_from).transpose()
    }
}
