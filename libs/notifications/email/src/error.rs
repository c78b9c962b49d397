//! Error types for the mail relay.

use std::time::Duration;
use thiserror::Error;

/// A single send attempt against one provider failed.
#[derive(Debug, Error)]
pub enum MailerError {
    #[error("Invalid address '{address}': {details}")]
    Address { address: String, details: String },

    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    #[error("SMTP attempt timed out after {0:?}")]
    Timeout(Duration),

    #[error("Message rejected: {0}")]
    Rejected(String),
}

/// The provider registry could not be loaded.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Failed to read provider file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse provider registry: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid provider '{name}': {details}")]
    InvalidProvider { name: String, details: String },
}

/// A credential could not be retrieved.
#[derive(Debug, Error)]
pub enum SecretError {
    #[error("Secret '{0}' not found")]
    NotFound(String),

    #[error("Secret backend error for '{identifier}': {details}")]
    Backend { identifier: String, details: String },
}

/// The message could not be rendered.
#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("Invalid {field} address '{address}': {details}")]
    Address {
        field: &'static str,
        address: String,
        details: String,
    },

    #[error("Failed to build message: {0}")]
    Build(#[from] lettre::error::Error),
}

/// Failure outcome of a dispatch.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("SMTP credentials not set")]
    CredentialsNotSet,

    #[error("SMTP recipient not set")]
    RecipientNotSet,

    #[error("no valid SMTP provider configured")]
    NoValidProvider,

    #[error("failed to send email with all providers ({attempts} attempted, last: {last_provider})")]
    AllProvidersFailed {
        attempts: usize,
        last_provider: String,
        #[source]
        source: MailerError,
    },

    #[error("request deadline exceeded after {attempts} provider attempts")]
    DeadlineExceeded {
        attempts: usize,
        #[source]
        last_error: Option<MailerError>,
    },
}

impl DispatchError {
    /// Stable reason code for logs and metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::CredentialsNotSet => "credentials_not_set",
            Self::RecipientNotSet => "recipient_not_set",
            Self::NoValidProvider => "no_valid_provider",
            Self::AllProvidersFailed { .. } => "all_providers_failed",
            Self::DeadlineExceeded { .. } => "deadline_exceeded",
        }
    }

    /// Number of network attempts made before failing.
    pub fn attempts(&self) -> usize {
        match self {
            Self::AllProvidersFailed { attempts, .. } | Self::DeadlineExceeded { attempts, .. } => {
                *attempts
            }
            _ => 0,
        }
    }

    /// True for failures caused by missing configuration rather than delivery.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::CredentialsNotSet | Self::RecipientNotSet)
    }
}
