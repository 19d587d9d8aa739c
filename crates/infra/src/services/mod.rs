mod notifier;

pub use notifier::{INotifier, LogNotifier, ResendNotifier};
pub(crate) use notifier::RESEND_API_BASE_URL;
