//! Outbound notification collaborator.
//!
//! Mail delivery is external to this system; the trait is the seam, and the
//! default implementation just records what would have been sent.

use async_trait::async_trait;

use crate::error::ApiResult;

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Delivers the password-reset token to the account's mailbox.
    async fn send_password_reset(&self, email: &str, token: &str) -> ApiResult<()>;
}

/// Logs instead of sending. Stands in until a real provider is wired up.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_password_reset(&self, email: &str, token: &str) -> ApiResult<()> {
        tracing::info!(email, token, "password reset requested");
        Ok(())
    }
}
