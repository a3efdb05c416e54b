//! Notification collaborator (C5) -- out of scope per the external-collaborator
//! list, so this is a trait only. The teacher's Firebase/SMTP provider pair
//! and circuit breaker (`services/otp_delivery.rs`) stand behind this same
//! seam in production; here it's reduced to the interface the OTP engine
//! dispatches through, plus a logging double for tests and local runs.

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification dispatch failed: {0}")]
    DispatchFailed(String),
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_sms(&self, to: &str, body: &str) -> Result<(), NotifyError>;
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifyError>;
}

/// Logs instead of dispatching. Notification failures must never fail
/// signup/reset (§7), so flows treat this the same as a real provider that
/// occasionally errors -- they just log and move on.
pub struct LoggingNotifier;

#[async_trait]
impl Notifier for LoggingNotifier {
    async fn send_sms(&self, to: &str, body: &str) -> Result<(), NotifyError> {
        info!(target: "notification", %to, %body, "sms dispatched");
        Ok(())
    }

    async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        info!(target: "notification", %to, %subject, %body, "email dispatched");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn logging_notifier_never_fails() {
        let notifier = LoggingNotifier;
        assert!(notifier.send_sms("+989123456789", "code: 123456").await.is_ok());
        assert!(notifier
            .send_email("john@example.com", "reset", "code: 123456")
            .await
            .is_ok());
    }
}
