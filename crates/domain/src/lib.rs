mod reminder;
mod shared;

pub use reminder::{
    ChannelsDecodeError, InvalidReminderError, NewReminder, NotificationChannels, Reminder,
    ReminderStatus, ReminderType, EMAIL_CHANNEL,
};
pub use shared::entity::{Entity, InvalidIDError, ID};
pub use shared::recurrence::{Recurrence, RecurrenceError};
pub use shared::variant::InvalidVariantError;
