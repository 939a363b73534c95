//! Outbound e-mail seam. SMTP delivery belongs to the surrounding
//! application; the domain builds the messages and hands them to an
//! [`EmailNotifier`] implementation.

use serde::{Deserialize, Serialize};

/// A fully composed message ready for the delivery collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Trait describing the outbound e-mail hook.
pub trait EmailNotifier: Send + Sync {
    fn send(&self, message: EmailMessage) -> Result<(), NotifyError>;
}

/// Notification dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("mail transport unavailable: {0}")]
    Transport(String),
}

/// Password-reset message; the link stays valid for 30 minutes.
pub fn password_reset_email(to: &str, reset_link: &str) -> EmailMessage {
    EmailMessage {
        to: to.to_string(),
        subject: "Password reset - Fleet SLA".to_string(),
        body: format!(
            "Hello,\n\n\
             We received a request to reset your Fleet SLA password.\n\
             Use the link below (valid for 30 minutes):\n\n\
             {reset_link}\n\n\
             If you did not request this, ignore this e-mail.\n"
        ),
    }
}

/// Sent when an administrator approves an account that already has a
/// password.
pub fn account_approved_email(to: &str, base_url: &str) -> EmailMessage {
    EmailMessage {
        to: to.to_string(),
        subject: "Account approved - Fleet SLA".to_string(),
        body: format!(
            "Hello,\n\n\
             Your Fleet SLA account has been approved.\n\
             Access the platform: {base_url}\n\n\
             Welcome aboard!\n"
        ),
    }
}

/// Sent when an approved account still needs its initial password.
pub fn set_password_invite_email(to: &str, reset_link: &str) -> EmailMessage {
    EmailMessage {
        to: to.to_string(),
        subject: "Your account was approved - set your password".to_string(),
        body: format!(
            "Hello,\n\n\
             Your Fleet SLA account has been approved.\n\
             To set your initial password, use the link (valid for 30 minutes):\n\
             {reset_link}\n\n\
             If you do not recognize this request, ignore this e-mail.\n"
        ),
    }
}
