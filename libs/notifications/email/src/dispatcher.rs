//! Ordered provider fallback.
//!
//! The dispatcher walks the configured provider names in order, skips names
//! the registry does not know, and makes one send attempt per resolved
//! provider until one succeeds. Attempts are strictly sequential: running
//! them concurrently could deliver the same message twice.

use crate::error::{DispatchError, MailerError};
use crate::provider::{Mailer, SmtpAuth};
use crate::registry::ProviderRegistry;
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Provider priority used when none is configured.
pub const DEFAULT_PROVIDER_ORDER: &str = "gmail,microsoft";

/// Upper bound on a single provider attempt.
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(10);

/// Split a comma-separated provider list into trimmed, non-empty names,
/// preserving order.
pub fn parse_provider_order(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Everything needed to attempt delivery of one message.
#[derive(Clone)]
pub struct DispatchRequest {
    /// Rendered message, headers included
    pub message: Vec<u8>,
    /// SMTP login and envelope sender
    pub sender: String,
    /// SMTP password
    pub secret: String,
    pub recipient: String,
    /// Provider names in priority order
    pub providers: Vec<String>,
    /// No attempt starts after this instant
    pub deadline: Option<Instant>,
}

impl DispatchRequest {
    pub fn new(
        message: Vec<u8>,
        sender: impl Into<String>,
        secret: impl Into<String>,
        recipient: impl Into<String>,
        providers: &str,
    ) -> Self {
        Self {
            message,
            sender: sender.into(),
            secret: secret.into(),
            recipient: recipient.into(),
            providers: parse_provider_order(providers),
            deadline: None,
        }
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

impl fmt::Debug for DispatchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchRequest")
            .field("message_len", &self.message.len())
            .field("sender", &self.sender)
            .field("secret", &"<redacted>")
            .field("recipient", &self.recipient)
            .field("providers", &self.providers)
            .field("deadline", &self.deadline)
            .finish()
    }
}

/// Successful dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// Provider that accepted the message
    pub provider: String,
    /// Network attempts made, the successful one included
    pub attempts: usize,
}

pub type DispatchOutcome = Result<Delivery, DispatchError>;

/// Sends a message through the first provider that accepts it.
#[derive(Debug, Clone)]
pub struct Dispatcher<M> {
    mailer: M,
    attempt_timeout: Duration,
}

impl<M: Mailer> Dispatcher<M> {
    pub fn new(mailer: M) -> Self {
        Self {
            mailer,
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
        }
    }

    pub fn with_attempt_timeout(mut self, attempt_timeout: Duration) -> Self {
        self.attempt_timeout = attempt_timeout;
        self
    }

    pub fn mailer(&self) -> &M {
        &self.mailer
    }

    /// Time allowed for the next attempt, `None` once the deadline has passed.
    fn attempt_budget(&self, deadline: Option<Instant>) -> Option<Duration> {
        match deadline {
            None => Some(self.attempt_timeout),
            Some(deadline) => {
                let remaining = deadline.saturating_duration_since(Instant::now());
                (!remaining.is_zero()).then(|| remaining.min(self.attempt_timeout))
            }
        }
    }

    #[instrument(
        skip_all,
        fields(mailer = self.mailer.name(), providers = ?request.providers)
    )]
    pub async fn dispatch(
        &self,
        request: &DispatchRequest,
        registry: &ProviderRegistry,
    ) -> DispatchOutcome {
        let auth = SmtpAuth::new(request.sender.trim(), request.secret.as_str());
        if !auth.is_complete() {
            warn!("SMTP user or password not set");
            return Err(DispatchError::CredentialsNotSet);
        }

        let recipient = request.recipient.trim();
        if recipient.is_empty() {
            warn!("SMTP recipient not set");
            return Err(DispatchError::RecipientNotSet);
        }

        let mut attempts = 0;
        let mut last_failure: Option<(String, MailerError)> = None;

        for name in &request.providers {
            let Some(provider) = registry.get(name) else {
                debug!(provider = %name, "Provider not in registry, skipping");
                continue;
            };

            let Some(budget) = self.attempt_budget(request.deadline) else {
                warn!(attempts, "Request deadline exceeded, abandoning remaining providers");
                return Err(DispatchError::DeadlineExceeded {
                    attempts,
                    last_error: last_failure.map(|(_, error)| error),
                });
            };

            attempts += 1;
            let send = self.mailer.send(
                &provider.host,
                provider.port,
                &auth,
                &auth.username,
                recipient,
                &request.message,
            );
            let result = match tokio::time::timeout(budget, send).await {
                Ok(result) => result,
                Err(_) => Err(MailerError::Timeout(budget)),
            };

            match result {
                Ok(()) => {
                    info!(
                        provider = %name,
                        address = %provider.address(),
                        attempts,
                        "Message sent"
                    );
                    return Ok(Delivery {
                        provider: name.clone(),
                        attempts,
                    });
                }
                Err(error) => {
                    warn!(
                        provider = %name,
                        address = %provider.address(),
                        error = %error,
                        "SendMail error"
                    );
                    last_failure = Some((name.clone(), error));
                }
            }
        }

        match last_failure {
            Some((last_provider, source)) => Err(DispatchError::AllProvidersFailed {
                attempts,
                last_provider,
                source,
            }),
            None => {
                warn!("No configured provider name resolved in the registry");
                Err(DispatchError::NoValidProvider)
            }
        }
    }
}
