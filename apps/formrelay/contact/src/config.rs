use core_config::{AppInfo, ConfigError, Environment, FromEnv, app_info, env_parse, server::ServerConfig};
use domain_contact::ContactConfig;
use std::fmt;
use std::str::FromStr;

/// Where SMTP credentials are read from (`SECRET_BACKEND`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SecretBackend {
    /// Identifiers are environment variable names
    Env,
    /// Google Secret Manager
    Gcp,
}

impl FromStr for SecretBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "env" => Ok(Self::Env),
            "gcp" => Ok(Self::Gcp),
            other => Err(format!("unknown secret backend '{}', expected env or gcp", other)),
        }
    }
}

impl fmt::Display for SecretBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Env => write!(f, "env"),
            Self::Gcp => write!(f, "gcp"),
        }
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub contact: ContactConfig,
    pub environment: Environment,
    pub secret_backend: SecretBackend,
    pub server: ServerConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            app: app_info!(),
            contact: ContactConfig::from_env()?,
            environment: Environment::from_env(),
            secret_backend: env_parse("SECRET_BACKEND", SecretBackend::Env)?,
            server: ServerConfig::from_env()?, // HOST=0.0.0.0, PORT=8080 unless set
        })
    }
}
