//! SMTP credential sources

pub mod gcp;

pub use gcp::GcpSecretManager;

use crate::error::SecretError;
use async_trait::async_trait;
use std::collections::HashMap;

/// Look up a secret value by identifier.
#[async_trait]
pub trait SecretSource: Send + Sync {
    async fn fetch_secret(&self, identifier: &str) -> Result<String, SecretError>;
}

/// Identifiers are environment variable names.
#[derive(Debug, Clone, Default)]
pub struct EnvSecretSource;

impl EnvSecretSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SecretSource for EnvSecretSource {
    async fn fetch_secret(&self, identifier: &str) -> Result<String, SecretError> {
        std::env::var(identifier)
            .ok()
            .filter(|value| !value.is_empty())
            .ok_or_else(|| SecretError::NotFound(identifier.to_string()))
    }
}

/// Fixed identifier → value map.
#[derive(Debug, Clone, Default)]
pub struct InMemorySecretSource {
    secrets: HashMap<String, String>,
}

impl InMemorySecretSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_secret(mut self, identifier: impl Into<String>, value: impl Into<String>) -> Self {
        self.secrets.insert(identifier.into(), value.into());
        self
    }
}

#[async_trait]
impl SecretSource for InMemorySecretSource {
    async fn fetch_secret(&self, identifier: &str) -> Result<String, SecretError> {
        self.secrets
            .get(identifier)
            .cloned()
            .ok_or_else(|| SecretError::NotFound(identifier.to_string()))
    }
}

#[async_trait]
impl<T: SecretSource + ?Sized> SecretSource for std::sync::Arc<T> {
    async fn fetch_secret(&self, identifier: &str) -> Result<String, SecretError> {
        (**self).fetch_secret(identifier).await
    }
}

#[async_trait]
impl<T: SecretSource + ?Sized> SecretSource for Box<T> {
    async fn fetch_secret(&self, identifier: &str) -> Result<String, SecretError> {
        (**self).fetch_secret(identifier).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_env_source_reads_variable() {
        let value = temp_env::async_with_vars([("FORMRELAY_SMTP_USER", Some("relay@example.com"))], async {
            EnvSecretSource::new().fetch_secret("FORMRELAY_SMTP_USER").await
        })
        .await;
        assert_eq!(value.unwrap(), "relay@example.com");
    }

    #[tokio::test]
    async fn test_env_source_empty_is_not_found() {
        let result = temp_env::async_with_vars([("FORMRELAY_SMTP_PASS", Some(""))], async {
            EnvSecretSource::new().fetch_secret("FORMRELAY_SMTP_PASS").await
        })
        .await;
        assert!(matches!(result, Err(SecretError::NotFound(ref id)) if id == "FORMRELAY_SMTP_PASS"));
    }

    #[tokio::test]
    async fn test_in_memory_source() {
        let source = InMemorySecretSource::new().with_secret("SMTP_USER", "relay@example.com");
        assert_eq!(source.fetch_secret("SMTP_USER").await.unwrap(), "relay@example.com");
        assert!(matches!(
            source.fetch_secret("SMTP_PASS").await,
            Err(SecretError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_boxed_source_delegates() {
        let source: Box<dyn SecretSource> =
            Box::new(InMemorySecretSource::new().with_secret("SMTP_PASS", "secret"));
        assert_eq!(source.fetch_secret("SMTP_PASS").await.unwrap(), "secret");
    }
}
