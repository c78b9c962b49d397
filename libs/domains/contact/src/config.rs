use core_config::{ConfigError, FromEnv, env_optional, env_parse};
use email::{DEFAULT_ATTEMPT_TIMEOUT, DEFAULT_PROVIDER_ORDER, RegistrySource};
use std::time::Duration;

pub const DEFAULT_SUBJECT: &str = "Contact Form Submission";
pub const DEFAULT_USER_SECRET: &str = "SMTP_USER";
pub const DEFAULT_PASS_SECRET: &str = "SMTP_PASS";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Contact relay settings.
///
/// Environment:
/// - `SMTP_TO` - recipient; may be unset, which fails submissions with a config error
/// - `SMTP_PROVIDERS` - comma-separated provider priority (default: `gmail,microsoft`)
/// - `SMTP_USER_SECRET` / `SMTP_PASS_SECRET` - secret identifiers for the SMTP login
/// - `SMTP_ATTEMPT_TIMEOUT_SECS` - per-provider attempt bound (default: 10)
/// - `REQUEST_TIMEOUT_SECS` - overall request deadline (default: 30)
/// - `CONTACT_SUBJECT` - subject line
/// - `SMTP_PROVIDERS_FILE` / `SMTP_PROVIDERS_YAML` - provider registry override
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactConfig {
    pub recipient: String,
    pub providers: String,
    pub user_secret: String,
    pub pass_secret: String,
    pub attempt_timeout: Duration,
    pub request_timeout: Duration,
    pub subject: String,
    pub registry: RegistrySource,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            recipient: String::new(),
            providers: DEFAULT_PROVIDER_ORDER.to_string(),
            user_secret: DEFAULT_USER_SECRET.to_string(),
            pass_secret: DEFAULT_PASS_SECRET.to_string(),
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            subject: DEFAULT_SUBJECT.to_string(),
            registry: RegistrySource::Builtin,
        }
    }
}

fn seconds(key: &str, default: Duration) -> Result<Duration, ConfigError> {
    let secs: u64 = env_parse(key, default.as_secs())?;
    if secs == 0 {
        return Err(ConfigError::ParseError {
            key: key.to_string(),
            details: "must be greater than zero".to_string(),
        });
    }
    Ok(Duration::from_secs(secs))
}

impl FromEnv for ContactConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            recipient: env_optional("SMTP_TO").unwrap_or_default(),
            providers: env_optional("SMTP_PROVIDERS")
                .unwrap_or_else(|| DEFAULT_PROVIDER_ORDER.to_string()),
            user_secret: env_optional("SMTP_USER_SECRET")
                .unwrap_or_else(|| DEFAULT_USER_SECRET.to_string()),
            pass_secret: env_optional("SMTP_PASS_SECRET")
                .unwrap_or_else(|| DEFAULT_PASS_SECRET.to_string()),
            attempt_timeout: seconds("SMTP_ATTEMPT_TIMEOUT_SECS", DEFAULT_ATTEMPT_TIMEOUT)?,
            request_timeout: seconds("REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT)?,
            subject: env_optional("CONTACT_SUBJECT").unwrap_or_else(|| DEFAULT_SUBJECT.to_string()),
            registry: RegistrySource::from_env(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const KEYS: [&str; 10] = [
        "SMTP_TO",
        "SMTP_PROVIDERS",
        "SMTP_USER_SECRET",
        "SMTP_PASS_SECRET",
        "SMTP_ATTEMPT_TIMEOUT_SECS",
        "REQUEST_TIMEOUT_SECS",
        "CONTACT_SUBJECT",
        "SMTP_PROVIDERS_FILE",
        "SMTP_PROVIDERS_YAML",
        "APP_ENV",
    ];

    /// Every relay variable unset except the given overrides.
    fn vars(overrides: &[(&'static str, &'static str)]) -> Vec<(&'static str, Option<&'static str>)> {
        KEYS.iter()
            .map(|key| {
                let value = overrides.iter().find(|(k, _)| k == key).map(|(_, v)| *v);
                (*key, value)
            })
            .collect()
    }

    #[test]
    fn test_defaults() {
        temp_env::with_vars(vars(&[]), || {
            let config = ContactConfig::from_env().unwrap();
            assert_eq!(config, ContactConfig::default());
            assert_eq!(config.providers, "gmail,microsoft");
            assert_eq!(config.attempt_timeout, Duration::from_secs(10));
        });
    }

    #[test]
    fn test_blank_provider_order_uses_default() {
        for blank in ["", "   "] {
            temp_env::with_vars(vars(&[("SMTP_PROVIDERS", blank)]), || {
                let config = ContactConfig::from_env().unwrap();
                assert_eq!(config.providers, "gmail,microsoft");
            });
        }
    }

    #[test]
    fn test_overrides() {
        let overrides = vars(&[
            ("SMTP_TO", "owner@example.com"),
            ("SMTP_PROVIDERS", "microsoft,gmail"),
            ("SMTP_USER_SECRET", "projects/p/secrets/user/versions/2"),
            ("SMTP_ATTEMPT_TIMEOUT_SECS", "5"),
            ("REQUEST_TIMEOUT_SECS", "20"),
            ("SMTP_PROVIDERS_FILE", "/etc/formrelay/providers.yaml"),
        ]);

        temp_env::with_vars(overrides, || {
            let config = ContactConfig::from_env().unwrap();
            assert_eq!(config.recipient, "owner@example.com");
            assert_eq!(config.providers, "microsoft,gmail");
            assert_eq!(config.user_secret, "projects/p/secrets/user/versions/2");
            assert_eq!(config.pass_secret, "SMTP_PASS");
            assert_eq!(config.attempt_timeout, Duration::from_secs(5));
            assert_eq!(config.request_timeout, Duration::from_secs(20));
            assert_eq!(
                config.registry,
                RegistrySource::File(PathBuf::from("/etc/formrelay/providers.yaml"))
            );
        });
    }

    #[test]
    fn test_invalid_timeouts_are_rejected() {
        for value in ["soon", "0", "-1"] {
            temp_env::with_vars(vars(&[("SMTP_ATTEMPT_TIMEOUT_SECS", value)]), || {
                let err = ContactConfig::from_env().unwrap_err();
                assert!(err.to_string().contains("SMTP_ATTEMPT_TIMEOUT_SECS"));
            });
        }
    }
}
