//! SMTP provider registry.
//!
//! A registry is an immutable snapshot of name → endpoint. It is loaded per
//! request from one of the [`RegistrySource`]s and never mutated afterwards.

use crate::error::RegistryError;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use tracing::debug;

/// One SMTP endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderDescriptor {
    pub name: String,
    pub host: String,
    pub port: u16,
}

impl ProviderDescriptor {
    pub fn new(name: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            port,
        }
    }

    /// "host:port" form used in logs
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Provider name → descriptor. Names are unique.
#[derive(Debug, Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, ProviderDescriptor>,
}

impl ProviderRegistry {
    /// The built-in provider table.
    pub fn builtin() -> Self {
        Self::from_descriptors([
            ProviderDescriptor::new("gmail", "smtp.gmail.com", 587),
            ProviderDescriptor::new("microsoft", "smtp.office365.com", 587),
        ])
    }

    /// Build a registry from descriptors. A later descriptor with the same
    /// name replaces an earlier one.
    pub fn from_descriptors(descriptors: impl IntoIterator<Item = ProviderDescriptor>) -> Self {
        let providers = descriptors
            .into_iter()
            .map(|descriptor| (descriptor.name.clone(), descriptor))
            .collect();
        Self { providers }
    }

    /// Parse a registry document:
    ///
    /// ```yaml
    /// smtp_providers:
    ///   gmail:
    ///     host: smtp.gmail.com
    ///     port: 587
    /// ```
    pub fn from_yaml_str(yaml: &str) -> Result<Self, RegistryError> {
        let document: RegistryDocument = serde_yaml::from_str(yaml)?;

        let mut descriptors = Vec::with_capacity(document.smtp_providers.len());
        for (name, entry) in document.smtp_providers {
            descriptors.push(entry.into_descriptor(name)?);
        }

        Ok(Self::from_descriptors(descriptors))
    }

    pub fn get(&self, name: &str) -> Option<&ProviderDescriptor> {
        self.providers.get(name)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.providers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Where the registry comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrySource {
    Builtin,
    File(PathBuf),
    Inline(String),
}

impl RegistrySource {
    /// `SMTP_PROVIDERS_FILE` wins over `SMTP_PROVIDERS_YAML`, which wins over
    /// the built-in table.
    pub fn from_env() -> Self {
        let read = |key: &str| {
            std::env::var(key)
                .ok()
                .filter(|value| !value.trim().is_empty())
        };

        if let Some(path) = read("SMTP_PROVIDERS_FILE") {
            Self::File(PathBuf::from(path.trim()))
        } else if let Some(yaml) = read("SMTP_PROVIDERS_YAML") {
            Self::Inline(yaml)
        } else {
            Self::Builtin
        }
    }

    pub async fn load(&self) -> Result<ProviderRegistry, RegistryError> {
        let registry = match self {
            Self::Builtin => ProviderRegistry::builtin(),
            Self::Inline(yaml) => ProviderRegistry::from_yaml_str(yaml)?,
            Self::File(path) => {
                let contents =
                    tokio::fs::read_to_string(path)
                        .await
                        .map_err(|source| RegistryError::Io {
                            path: path.display().to_string(),
                            source,
                        })?;
                ProviderRegistry::from_yaml_str(&contents)?
            }
        };

        debug!(providers = ?registry.names(), "Provider registry loaded");
        Ok(registry)
    }
}

#[derive(Debug, Deserialize)]
struct RegistryDocument {
    #[serde(default)]
    smtp_providers: BTreeMap<String, ProviderEntry>,
}

#[derive(Debug, Deserialize)]
struct ProviderEntry {
    host: String,
    port: PortValue,
}

/// Ports are written both as `587` and `"587"` in the wild.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PortValue {
    Number(u64),
    Text(String),
}

impl ProviderEntry {
    fn into_descriptor(self, name: String) -> Result<ProviderDescriptor, RegistryError> {
        let invalid = |details: String| RegistryError::InvalidProvider {
            name: name.clone(),
            details,
        };

        let host = self.host.trim().to_string();
        if host.is_empty() {
            return Err(invalid("host is empty".to_string()));
        }

        let port = match self.port {
            PortValue::Number(n) => u16::try_from(n).ok(),
            PortValue::Text(text) => text.trim().parse::<u16>().ok(),
        }
        .filter(|port| *port != 0)
        .ok_or_else(|| invalid("port must be between 1 and 65535".to_string()))?;

        Ok(ProviderDescriptor::new(name, host, port))
    }
}
