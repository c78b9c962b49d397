//! Outbound mail relay with ordered provider fallback.
//!
//! ## Components
//!
//! - **Registry**: `ProviderRegistry` maps provider names to SMTP endpoints
//!   (built-in table, YAML file or inline YAML)
//! - **Mailer**: the `Mailer` capability with the lettre-backed `SmtpMailer`
//!   and the `RecordingMailer` test double
//! - **Secrets**: `SecretSource` for SMTP credentials (environment, in-memory,
//!   Google Secret Manager)
//! - **Dispatcher**: tries providers in order until one accepts the message
//!
//! ## Usage
//!
//! ```ignore
//! use email::{DispatchRequest, Dispatcher, ProviderRegistry, SmtpMailer};
//!
//! let dispatcher = Dispatcher::new(SmtpMailer::new());
//! let request = DispatchRequest::new(payload, user, pass, "inbox@example.com", "gmail,microsoft");
//! let delivery = dispatcher.dispatch(&request, &ProviderRegistry::builtin()).await?;
//! ```

pub mod dispatcher;
pub mod error;
pub mod message;
pub mod provider;
pub mod registry;
pub mod secrets;

pub use dispatcher::{
    parse_provider_order, Delivery, DispatchOutcome, DispatchRequest, Dispatcher,
    DEFAULT_ATTEMPT_TIMEOUT, DEFAULT_PROVIDER_ORDER,
};
pub use error::{ComposeError, DispatchError, MailerError, RegistryError, SecretError};
pub use message::{compose_message, ComposeParams};
pub use provider::{Mailer, RecordingMailer, SendAttempt, SmtpAuth, SmtpMailer};
pub use registry::{ProviderDescriptor, ProviderRegistry, RegistrySource};
pub use secrets::{EnvSecretSource, GcpSecretManager, InMemorySecretSource, SecretSource};
