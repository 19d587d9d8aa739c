use crate::services::RESEND_API_BASE_URL;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// API key for the Resend email API. When it is missing reminder emails
    /// are only written to the log.
    pub resend_api_key: Option<String>,
    /// Sender address of reminder emails
    pub resend_from_email: String,
    pub resend_api_base_url: String,
    /// Upper bound for delivering a notification on a single channel.
    /// A delivery that takes longer counts as failed.
    pub notification_timeout: Duration,
    /// How often the job processing due reminders runs. The job is not
    /// started when this is `None`.
    pub reminders_job_interval: Option<Duration>,
    /// Email address the reminders job notifies
    pub reminders_notify_email: Option<String>,
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|val| !val.trim().is_empty())
}

fn parse_secs_env(key: &str) -> Option<Duration> {
    let val = non_empty_env(key)?;
    match val.parse::<u64>() {
        Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
        _ => {
            warn!("The given {}: {} is not a valid number of seconds.", key, val);
            None
        }
    }
}

impl Config {
    pub fn new() -> Self {
        let default_port = 5000;
        let port = match non_empty_env("PORT") {
            Some(port) => match port.parse::<usize>() {
                Ok(port) => port,
                Err(_) => {
                    warn!(
                        "The given PORT: {} is not valid, falling back to the default port: {}.",
                        port, default_port
                    );
                    default_port
                }
            },
            None => default_port,
        };

        let resend_api_key = non_empty_env("RESEND_API_KEY");
        if resend_api_key.is_none() {
            info!("Did not find RESEND_API_KEY environment variable. Reminder emails will only be logged.");
        }

        let default_notification_timeout = Duration::from_secs(10);
        let notification_timeout = match non_empty_env("NOTIFICATION_TIMEOUT_SECS") {
            Some(_) => parse_secs_env("NOTIFICATION_TIMEOUT_SECS").unwrap_or_else(|| {
                warn!(
                    "Falling back to the default notification timeout: {:?}.",
                    default_notification_timeout
                );
                default_notification_timeout
            }),
            None => default_notification_timeout,
        };

        Self {
            port,
            resend_api_key,
            resend_from_email: non_empty_env("RESEND_FROM_EMAIL")
                .unwrap_or_else(|| "wedding-planner@example.com".into()),
            resend_api_base_url: non_empty_env("RESEND_API_BASE_URL")
                .unwrap_or_else(|| RESEND_API_BASE_URL.into()),
            notification_timeout,
            reminders_job_interval: parse_secs_env("REMINDERS_JOB_INTERVAL_SECS"),
            reminders_notify_email: non_empty_env("REMINDERS_NOTIFY_EMAIL"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
