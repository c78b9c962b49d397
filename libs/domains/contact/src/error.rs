use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use email::{ComposeError, DispatchError, RegistryError, SecretError};
use thiserror::Error;
use tracing::{error, info};

/// Response body of a successful submission.
pub const SUCCESS_MESSAGE: &str = "Message sent successfully!";

#[derive(Debug, Error)]
pub enum ContactError {
    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error("Spam detected")]
    Spam,

    #[error("Missing required fields")]
    MissingFields,

    #[error("Message too long")]
    MessageTooLong,

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Delivery failed: {0}")]
    Delivery(DispatchError),
}

pub type ContactResult<T> = Result<T, ContactError>;

impl ContactError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Spam | Self::MissingFields | Self::MessageTooLong | Self::InvalidEmail => {
                StatusCode::BAD_REQUEST
            }
            Self::Config(_) | Self::Delivery(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text shown to the caller. Server-side details never leave the process.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::MethodNotAllowed => "Method Not Allowed",
            Self::Spam => "Spam detected",
            Self::MissingFields => "Missing required fields",
            Self::MessageTooLong => "Message too long",
            Self::InvalidEmail => "Invalid email address",
            Self::Config(_) => "Server config error",
            Self::Delivery(_) => "Failed to send message. Please try again later.",
        }
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MethodNotAllowed => "method_not_allowed",
            Self::Spam => "spam",
            Self::MissingFields => "missing_fields",
            Self::MessageTooLong => "message_too_long",
            Self::InvalidEmail => "invalid_email",
            Self::Config(_) => "config",
            Self::Delivery(_) => "delivery",
        }
    }
}

/// Missing credentials or recipient are configuration problems; everything
/// else the dispatcher reports is a delivery failure.
impl From<DispatchError> for ContactError {
    fn from(err: DispatchError) -> Self {
        if err.is_configuration() {
            ContactError::Config(err.to_string())
        } else {
            ContactError::Delivery(err)
        }
    }
}

impl From<SecretError> for ContactError {
    fn from(err: SecretError) -> Self {
        ContactError::Config(err.to_string())
    }
}

impl From<ComposeError> for ContactError {
    fn from(err: ComposeError) -> Self {
        ContactError::Config(err.to_string())
    }
}

impl From<RegistryError> for ContactError {
    fn from(err: RegistryError) -> Self {
        ContactError::Config(err.to_string())
    }
}

impl IntoResponse for ContactError {
    fn into_response(self) -> Response {
        match &self {
            ContactError::Config(details) => {
                error!(kind = self.kind(), details = %details, "Contact relay misconfigured");
            }
            ContactError::Delivery(err) => {
                error!(
                    kind = self.kind(),
                    reason = err.reason(),
                    attempts = err.attempts(),
                    error = %err,
                    "Contact message not delivered"
                );
            }
            _ => info!(kind = self.kind(), "Contact submission rejected"),
        }

        (self.status_code(), self.public_message()).into_response()
    }
}
