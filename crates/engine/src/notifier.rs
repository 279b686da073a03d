//! Delivery of one-time codes to phones.

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

/// Failure reported by a notifier. Never fails the operation that triggered it.
#[derive(Debug, Error)]
#[error("notification failed: {0}")]
pub struct NotifyError(pub String);

/// Delivers a login code to a phone.
///
/// This trait is object-safe and can be used with `Arc<dyn Notifier>`.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send `code` to `phone`.
    async fn send(&self, phone: &str, code: &str) -> Result<(), NotifyError>;

    /// Get a human-readable name for this notifier.
    fn name(&self) -> &str;
}

/// Development notifier that writes codes to the log instead of sending them.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, phone: &str, code: &str) -> Result<(), NotifyError> {
        warn!(phone = %phone, code = %code, "No SMS gateway configured; OTP logged instead");
        Ok(())
    }

    fn name(&self) -> &str {
        "LogNotifier"
    }
}
