//! Recording mailer for tests and local runs

use super::{Mailer, SmtpAuth};
use crate::error::MailerError;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

/// One call made against the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendAttempt {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub from: String,
    pub to: String,
    pub body: Vec<u8>,
}

/// Mailer that records every attempt and fails on demand.
///
/// Clones share the same attempt log, so a test can hand one clone to the
/// code under test and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct RecordingMailer {
    attempts: Arc<Mutex<Vec<SendAttempt>>>,
    failing_hosts: Arc<HashSet<String>>,
    failure_message: Option<String>,
}

impl RecordingMailer {
    /// Create a mock that accepts every message
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock that rejects every message
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure_message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Create a mock that rejects messages sent to the given hosts only
    pub fn failing_hosts<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            failing_hosts: Arc::new(hosts.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// All attempts in call order, failed ones included
    pub fn attempts(&self) -> Vec<SendAttempt> {
        self.lock().clone()
    }

    pub fn attempt_count(&self) -> usize {
        self.lock().len()
    }

    /// Hosts contacted, in call order
    pub fn attempted_hosts(&self) -> Vec<String> {
        self.lock().iter().map(|a| a.host.clone()).collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<SendAttempt>> {
        // A panicking test thread must not hide the log from the others
        self.attempts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(
        &self,
        host: &str,
        port: u16,
        auth: &SmtpAuth,
        from: &str,
        to: &str,
        body: &[u8],
    ) -> Result<(), MailerError> {
        self.lock().push(SendAttempt {
            host: host.to_string(),
            port,
            username: auth.username.clone(),
            from: from.to_string(),
            to: to.to_string(),
            body: body.to_vec(),
        });

        if let Some(message) = &self.failure_message {
            return Err(MailerError::Rejected(message.clone()));
        }
        if self.failing_hosts.contains(host) {
            return Err(MailerError::Rejected(format!("mock rejection from {}", host)));
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
