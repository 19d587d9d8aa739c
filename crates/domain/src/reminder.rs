use crate::shared::{
    entity::{Entity, ID},
    recurrence::{Recurrence, RecurrenceError},
    variant::InvalidVariantError,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

/// Name of the channel which is delivered through the email `Notifier`
pub const EMAIL_CHANNEL: &str = "email";

/// A `Reminder` is a notification about a wedding task or vendor which
/// should be delivered at `remind_at`, optionally repeating itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Reminder {
    pub id: ID,
    pub task_id: Option<ID>,
    pub vendor_id: Option<ID>,
    pub title: String,
    /// Body of the notification. The `title` is used when this is missing.
    pub message: Option<String>,
    pub reminder_type: ReminderType,
    pub remind_at: DateTime<Utc>,
    pub recurrence: Recurrence,
    pub notification_channels: NotificationChannels,
    pub status: ReminderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The fields a client provides when creating a new `Reminder`
#[derive(Debug, Clone)]
pub struct NewReminder {
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

#[derive(Error, Debug, PartialEq)]
pub enum InvalidReminderError {
    #[error("Either task_id or vendor_id must be provided")]
    MissingReference,
    #[error("A reminder must have a non empty title")]
    EmptyTitle,
}

impl Reminder {
    pub fn new(params: NewReminder, now: DateTime<Utc>) -> Result<Self, InvalidReminderError> {
        if params.task_id.is_none() && params.vendor_id.is_none() {
            return Err(InvalidReminderError::MissingReference);
        }
        if params.title.trim().is_empty() {
            return Err(InvalidReminderError::EmptyTitle);
        }

        Ok(Self {
            id: Default::default(),
            task_id: params.task_id,
            vendor_id: params.vendor_id,
            title: params.title,
            message: params.message,
            reminder_type: params.reminder_type,
            remind_at: params.remind_at,
            recurrence: params.recurrence.unwrap_or_default(),
            notification_channels: NotificationChannels::encode(&params.notification_channels),
            status: params.status.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.status == ReminderStatus::Pending && self.remind_at <= now
    }

    /// The text delivered to the recipient
    pub fn body(&self) -> &str {
        self.message.as_deref().unwrap_or(&self.title)
    }

    /// Builds the next `Reminder` in the recurrence chain. Every field is
    /// copied except the id, the timestamps and `remind_at` which is moved
    /// forward by the `recurrence`. The successor always starts out as `Pending`.
    pub fn successor(&self, now: DateTime<Utc>) -> Result<Self, RecurrenceError> {
        let remind_at = self.recurrence.advance(self.remind_at)?;

        Ok(Self {
            id: Default::default(),
            remind_at,
            status: ReminderStatus::Pending,
            created_at: now,
            updated_at: now,
            ..self.clone()
        })
    }
}

impl Entity for Reminder {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReminderType {
    FollowUp,
    PaymentDue,
    Meeting,
    Deadline,
    Custom,
}

impl ReminderType {
    pub const VALUES: &'static [&'static str] =
        &["follow_up", "payment_due", "meeting", "deadline", "custom"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FollowUp => "follow_up",
            Self::PaymentDue => "payment_due",
            Self::Meeting => "meeting",
            Self::Deadline => "deadline",
            Self::Custom => "custom",
        }
    }
}

impl Display for ReminderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ReminderType {
    type Err = InvalidVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "follow_up" => Ok(Self::FollowUp),
            "payment_due" => Ok(Self::PaymentDue),
            "meeting" => Ok(Self::Meeting),
            "deadline" => Ok(Self::Deadline),
            "custom" => Ok(Self::Custom),
            _ => Err(InvalidVariantError::new("reminder_type", s, Self::VALUES)),
        }
    }
}

/// Only `Pending` reminders are ever considered due. `Dismissed` and
/// `Snoozed` are set by clients and left alone by reminder processing.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReminderStatus {
    #[default]
    Pending,
    Sent,
    Dismissed,
    Snoozed,
}

impl ReminderStatus {
    pub const VALUES: &'static [&'static str] = &["pending", "sent", "dismissed", "snoozed"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Sent => "sent",
            Self::Dismissed => "dismissed",
            Self::Snoozed => "snoozed",
        }
    }
}

impl Display for ReminderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ReminderStatus {
    type Err = InvalidVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "sent" => Ok(Self::Sent),
            "dismissed" => Ok(Self::Dismissed),
            "snoozed" => Ok(Self::Snoozed),
            _ => Err(InvalidVariantError::new("status", s, Self::VALUES)),
        }
    }
}

/// The channels of a `Reminder` in their stored form: a JSON array of
/// channel names, e.g. `["browser","email"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationChannels(String);

#[derive(Error, Debug)]
#[error("Malformed notification channels `{raw}`: {source}")]
pub struct ChannelsDecodeError {
    raw: String,
    source: serde_json::Error,
}

impl NotificationChannels {
    pub fn encode<S: AsRef<str>>(channels: &[S]) -> Self {
        let channels = channels
            .iter()
            .map(|c| serde_json::Value::from(c.as_ref()))
            .collect::<Vec<_>>();
        Self(serde_json::Value::Array(channels).to_string())
    }

    /// Wraps an already serialized channel list as read from storage
    pub fn from_raw(raw: String) -> Self {
        Self(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn decode(&self) -> Result<Vec<String>, ChannelsDecodeError> {
        serde_json::from_str(&self.0).map_err(|source| ChannelsDecodeError {
            raw: self.0.clone(),
            source,
        })
    }
}
