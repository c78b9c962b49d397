//! Google Cloud Secret Manager source
//!
//! Talks to the REST API directly. The access token comes from the metadata
//! server of the function's runtime service account.
//!
//! Environment:
//! - `GOOGLE_CLOUD_PROJECT` - project used to expand bare secret names
//! - `SECRET_VERSION` - version to read (default: `latest`)

use super::SecretSource;
use crate::error::SecretError;
use async_trait::async_trait;
use base64::Engine;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const SECRET_MANAGER_URL: &str = "https://secretmanager.googleapis.com/v1";
const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Reads secrets from Google Secret Manager.
#[derive(Debug, Clone)]
pub struct GcpSecretManager {
    client: Client,
    project_id: Option<String>,
    version: String,
    api_url: String,
    token_url: String,
}

#[derive(Debug, Deserialize)]
struct AccessTokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct AccessSecretResponse {
    payload: Option<SecretPayload>,
}

#[derive(Debug, Deserialize)]
struct SecretPayload {
    #[serde(default)]
    data: String,
}

impl GcpSecretManager {
    pub fn new(project_id: Option<String>, version: impl Into<String>) -> Result<Self, SecretError> {
        let client = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| SecretError::Backend {
                identifier: "client".to_string(),
                details: e.to_string(),
            })?;

        Ok(Self {
            client,
            project_id,
            version: version.into(),
            api_url: SECRET_MANAGER_URL.to_string(),
            token_url: METADATA_TOKEN_URL.to_string(),
        })
    }

    pub fn from_env() -> Result<Self, SecretError> {
        let project_id = std::env::var("GOOGLE_CLOUD_PROJECT")
            .ok()
            .filter(|value| !value.trim().is_empty());
        let version = std::env::var("SECRET_VERSION")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| "latest".to_string());
        Self::new(project_id, version)
    }

    /// Point at a different API and token endpoint (emulators, tests).
    pub fn with_endpoints(mut self, api_url: impl Into<String>, token_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self.token_url = token_url.into();
        self
    }

    /// Full resource name of a secret version.
    ///
    /// `projects/...` identifiers are used verbatim; bare names need a project.
    pub fn resource_name(&self, identifier: &str) -> Result<String, SecretError> {
        let identifier = identifier.trim();
        if identifier.starts_with("projects/") {
            return Ok(identifier.to_string());
        }

        let project = self.project_id.as_deref().ok_or_else(|| SecretError::Backend {
            identifier: identifier.to_string(),
            details: "GOOGLE_CLOUD_PROJECT not set".to_string(),
        })?;

        Ok(format!(
            "projects/{}/secrets/{}/versions/{}",
            project, identifier, self.version
        ))
    }

    async fn access_token(&self, identifier: &str) -> Result<String, SecretError> {
        let backend = |details: String| SecretError::Backend {
            identifier: identifier.to_string(),
            details,
        };

        let response = self
            .client
            .get(&self.token_url)
            .header("Metadata-Flavor", "Google")
            .send()
            .await
            .map_err(|e| backend(format!("metadata server unreachable: {}", e)))?
            .error_for_status()
            .map_err(|e| backend(format!("metadata server refused token: {}", e)))?;

        let token: AccessTokenResponse = response
            .json()
            .await
            .map_err(|e| backend(format!("invalid token response: {}", e)))?;

        Ok(token.access_token)
    }
}

#[async_trait]
impl SecretSource for GcpSecretManager {
    async fn fetch_secret(&self, identifier: &str) -> Result<String, SecretError> {
        let name = self.resource_name(identifier)?;
        let backend = |details: String| SecretError::Backend {
            identifier: name.clone(),
            details,
        };

        let token = self.access_token(&name).await?;
        let url = format!("{}/{}:access", self.api_url, name);

        debug!(secret = %name, "Accessing secret version");

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| backend(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(SecretError::NotFound(name.clone()));
        }

        let body: AccessSecretResponse = response
            .error_for_status()
            .map_err(|e| backend(e.to_string()))?
            .json()
            .await
            .map_err(|e| backend(format!("invalid access response: {}", e)))?;

        let encoded = body.payload.map(|p| p.data).unwrap_or_default();
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(encoded.as_bytes())
            .map_err(|e| backend(format!("payload is not base64: {}", e)))?;

        String::from_utf8(decoded).map_err(|e| backend(format!("payload is not UTF-8: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_name_expands_with_project_and_version() {
        let source = GcpSecretManager::new(Some("my-project".to_string()), "latest").unwrap();
        assert_eq!(
            source.resource_name("SMTP_USER").unwrap(),
            "projects/my-project/secrets/SMTP_USER/versions/latest"
        );
    }

    #[test]
    fn test_full_resource_name_is_verbatim() {
        let source = GcpSecretManager::new(None, "latest").unwrap();
        let name = "projects/other/secrets/SMTP_PASS/versions/1";
        assert_eq!(source.resource_name(name).unwrap(), name);
    }

    #[test]
    fn test_bare_name_without_project_fails() {
        let source = GcpSecretManager::new(None, "latest").unwrap();
        let err = source.resource_name("SMTP_USER").unwrap_err();
        assert!(err.to_string().contains("GOOGLE_CLOUD_PROJECT"));
    }

    #[test]
    fn test_from_env_defaults_version() {
        temp_env::with_vars(
            [("GOOGLE_CLOUD_PROJECT", Some("proj")), ("SECRET_VERSION", None)],
            || {
                let source = GcpSecretManager::from_env().unwrap();
                assert_eq!(
                    source.resource_name("SMTP_USER").unwrap(),
                    "projects/proj/secrets/SMTP_USER/versions/latest"
                );
            },
        );
    }

    #[tokio::test]
    async fn test_unreachable_metadata_server_is_backend_error() {
        let source = GcpSecretManager::new(Some("proj".to_string()), "1")
            .unwrap()
            .with_endpoints("http://127.0.0.1:9/v1", "http://127.0.0.1:9/token");
        let err = source.fetch_secret("SMTP_USER").await.unwrap_err();
        assert!(matches!(err, SecretError::Backend { .. }));
    }
}
