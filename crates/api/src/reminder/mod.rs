mod create_reminder;
mod delete_reminder;
mod get_due_reminders;
mod get_reminder;
mod get_reminders;
mod process_reminder;
mod update_reminder;
#[cfg(test)]
pub(crate) mod test_utils;

use crate::error::WeddingError;
use actix_web::web;
use create_reminder::create_reminder_controller;
use delete_reminder::delete_reminder_controller;
use get_due_reminders::get_due_reminders_controller;
use get_reminder::get_reminder_controller;
use get_reminders::get_reminders_controller;
use process_reminder::process_reminder_controller;
use std::str::FromStr;
use update_reminder::update_reminder_controller;
use wedding_planner_domain::InvalidVariantError;

pub(crate) use get_due_reminders::GetDueRemindersUseCase;
pub(crate) use process_reminder::ProcessReminderUseCase;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/reminders", web::get().to(get_reminders_controller));
    cfg.route("/reminders", web::post().to(create_reminder_controller));

    // Has to be registered before `/reminders/{reminder_id}`
    cfg.route("/reminders/due", web::get().to(get_due_reminders_controller));

    cfg.route(
        "/reminders/{reminder_id}",
        web::get().to(get_reminder_controller),
    );
    cfg.route(
        "/reminders/{reminder_id}",
        web::put().to(update_reminder_controller),
    );
    cfg.route(
        "/reminders/{reminder_id}",
        web::delete().to(delete_reminder_controller),
    );

    cfg.route(
        "/reminders/{reminder_id}/process",
        web::post().to(process_reminder_controller),
    );
}

/// Parses an optional enum value received from a client
fn parse_variant<T>(value: Option<&str>) -> Result<Option<T>, WeddingError>
where
    T: FromStr<Err = InvalidVariantError>,
{
    value
        .map(|v| v.parse::<T>())
        .transpose()
        .map_err(|e| WeddingError::BadClientData(e.to_string()))
}
