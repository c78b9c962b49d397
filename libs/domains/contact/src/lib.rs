//! Contact Domain
//!
//! Validates contact-form submissions and relays them as email through the
//! first SMTP provider that accepts them.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← POST gating, form extraction, HTTP mapping
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Validation, credentials, composition
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Dispatcher  │  ← Ordered provider fallback (email crate)
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use core_config::FromEnv;
//! use domain_contact::{ContactConfig, ContactService, handlers};
//! use email::{EnvSecretSource, SmtpMailer};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ContactConfig::from_env()?;
//! let service = ContactService::new(EnvSecretSource::new(), SmtpMailer::new(), config);
//! let router = handlers::router(service);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod service;

// Re-export commonly used types
pub use config::ContactConfig;
pub use error::{ContactError, ContactResult};
pub use models::{ContactForm, ContactSubmission, MAX_MESSAGE_CHARS};
pub use service::ContactService;
