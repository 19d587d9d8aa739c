mod config;
mod repos;
mod services;
mod system;

pub use config::Config;
pub use repos::{IReminderRepo, MarkSentResult, ReminderQuery, ReminderUpdate, Repos};
pub use services::{INotifier, LogNotifier, ResendNotifier};
use std::sync::Arc;
pub use system::{ISys, RealSys, StaticTimeSys};

#[derive(Clone)]
pub struct WeddingContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub notifier: Arc<dyn INotifier>,
}

struct ContextParams {
    pub postgres_connection_string: String,
}

fn create_notifier(config: &Config) -> Arc<dyn INotifier> {
    match &config.resend_api_key {
        Some(api_key) => Arc::new(ResendNotifier::new(
            api_key.clone(),
            config.resend_from_email.clone(),
            config.resend_api_base_url.clone(),
        )),
        None => Arc::new(LogNotifier),
    }
}

impl WeddingContext {
    async fn create(params: ContextParams) -> Self {
        let repos = Repos::create_postgres(&params.postgres_connection_string)
            .await
            .expect("Postgres credentials must be set and valid");
        let config = Config::new();
        Self {
            notifier: create_notifier(&config),
            repos,
            config,
            sys: Arc::new(RealSys {}),
        }
    }

    /// Context backed by inmemory repositories and a logging notifier.
    /// The reminders job is disabled.
    pub fn create_inmemory() -> Self {
        let mut config = Config::new();
        config.reminders_job_interval = None;
        Self {
            repos: Repos::create_inmemory(),
            config,
            sys: Arc::new(RealSys {}),
            notifier: Arc::new(LogNotifier),
        }
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> WeddingContext {
    WeddingContext::create(ContextParams {
        postgres_connection_string: get_psql_connection_string(),
    })
    .await
}

fn get_psql_connection_string() -> String {
    const PSQL_CONNECTION_STRING: &str = "DATABASE_URL";

    std::env::var(PSQL_CONNECTION_STRING)
        .unwrap_or_else(|_| panic!("{} env var to be present.", PSQL_CONNECTION_STRING))
}
