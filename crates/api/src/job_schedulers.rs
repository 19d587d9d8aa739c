use crate::{
    reminder::{GetDueRemindersUseCase, ProcessReminderUseCase},
    shared::usecase::execute,
};
use actix_web::rt::time::{interval, sleep_until, Instant};
use std::time::Duration;
use tracing::info;
use wedding_planner_infra::WeddingContext;

pub fn get_start_delay(now_ts: usize, secs_before_min: usize) -> usize {
    let secs_to_next_minute = 60 - (now_ts / 1000) % 60;
    if secs_to_next_minute > secs_before_min {
        secs_to_next_minute - secs_before_min
    } else {
        secs_to_next_minute + (60 - secs_before_min)
    }
}

/// Periodically processes every due reminder. Does nothing unless
/// `reminders_job_interval` is configured.
pub fn start_send_reminders_job(ctx: WeddingContext) {
    let period = match ctx.config.reminders_job_interval {
        Some(period) => period,
        None => return,
    };
    info!("Starting send reminders job with an interval of {:?}", period);

    actix_web::rt::spawn(async move {
        let now = ctx.sys.get_timestamp_millis();
        let secs_to_next_run = get_start_delay(now as usize, 0);
        let start = Instant::now() + Duration::from_secs(secs_to_next_run as u64);

        sleep_until(start).await;
        let mut job_interval = interval(period);
        loop {
            job_interval.tick().await;
            process_due_reminders(&ctx).await;
        }
    });
}

/// Returns the number of reminders that were processed
async fn process_due_reminders(ctx: &WeddingContext) -> usize {
    let reminders = match execute(GetDueRemindersUseCase, ctx).await {
        Ok(reminders) => reminders,
        Err(_) => return 0,
    };

    let mut processed = 0;
    for reminder in reminders {
        let usecase = ProcessReminderUseCase {
            reminder,
            notify_target: ctx.config.reminders_notify_email.clone(),
        };
        // Failures are logged by `execute` and retried on the next run
        if let Ok(res) = execute(usecase, ctx).await {
            info!(
                reminder_id = %res.reminder.id,
                next_reminder_id = ?res.successor.map(|r| r.id.to_string()),
                delivered = res.notifications.delivered,
                failed = res.notifications.failed,
                "Processed due reminder"
            );
            processed += 1;
        }
    }
    processed
}
