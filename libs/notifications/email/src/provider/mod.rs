//! The mail-sending capability and its implementations

pub mod mock;
pub mod smtp;

pub use mock::{RecordingMailer, SendAttempt};
pub use smtp::SmtpMailer;

use crate::error::MailerError;
use async_trait::async_trait;
use std::fmt;

/// SMTP login credentials
#[derive(Clone, PartialEq, Eq)]
pub struct SmtpAuth {
    pub username: String,
    pub password: String,
}

impl SmtpAuth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Both halves must be present before any attempt is made.
    pub fn is_complete(&self) -> bool {
        !self.username.trim().is_empty() && !self.password.is_empty()
    }
}

impl fmt::Debug for SmtpAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpAuth")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Attempt one delivery of an already-rendered message to one SMTP endpoint.
///
/// Implementations make exactly one attempt per call and report either full
/// acceptance or a clean failure.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(
        &self,
        host: &str,
        port: u16,
        auth: &SmtpAuth,
        from: &str,
        to: &str,
        body: &[u8],
    ) -> Result<(), MailerError>;

    /// Get the mailer name for logging
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_debug_redacts_password() {
        let auth = SmtpAuth::new("relay@example.com", "hunter2");
        let debug = format!("{:?}", auth);
        assert!(debug.contains("relay@example.com"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_auth_completeness() {
        assert!(SmtpAuth::new("user", "pass").is_complete());
        assert!(!SmtpAuth::new("", "pass").is_complete());
        assert!(!SmtpAuth::new("  ", "pass").is_complete());
        assert!(!SmtpAuth::new("user", "").is_complete());
    }
}
