mod resend;

pub use resend::{ResendNotifier, RESEND_API_BASE_URL};
use tracing::info;

/// Delivers a single notification to a destination, e.g. an email address.
#[async_trait::async_trait]
pub trait INotifier: Send + Sync {
    async fn send(&self, destination: &str, subject: &str, body: &str) -> anyhow::Result<()>;
}

/// Used when no email provider is configured. It only logs what would
/// have been sent and always succeeds.
pub struct LogNotifier;

#[async_trait::async_trait]
impl INotifier for LogNotifier {
    async fn send(&self, destination: &str, subject: &str, body: &str) -> anyhow::Result<()> {
        info!(
            destination,
            subject, body, "Email provider not configured. Would have sent reminder email"
        );
        Ok(())
    }
}
