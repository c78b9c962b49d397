use axum_helpers::server::{create_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_contact::{ContactService, handlers};
use email::{EnvSecretSource, GcpSecretManager, SecretSource, SmtpMailer};
use eyre::WrapErr;
use tracing::{info, warn};

mod config;

use config::{Config, SecretBackend};

fn secret_source(backend: SecretBackend) -> eyre::Result<Box<dyn SecretSource>> {
    Ok(match backend {
        SecretBackend::Env => Box::new(EnvSecretSource::new()),
        SecretBackend::Gcp => Box::new(
            GcpSecretManager::from_env().wrap_err("Failed to create Secret Manager client")?,
        ),
    })
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    let config = Config::from_env().wrap_err("Invalid configuration")?;

    // Initialize tracing with ErrorLayer for span trace capture
    init_tracing(&config.environment);

    info!(
        providers = %config.contact.providers,
        secret_backend = %config.secret_backend,
        "Configuring contact relay"
    );
    if config.contact.recipient.is_empty() {
        warn!("SMTP_TO is not set, submissions will fail with a config error");
    }

    let secrets = secret_source(config.secret_backend)?;
    let service = ContactService::new(secrets, SmtpMailer::new(), config.contact.clone());

    let app = create_router(handlers::router(service).merge(health_router(config.app)));

    create_app(app, &config.server)
        .await
        .wrap_err("Server error")?;

    info!("Contact relay shutdown complete");
    Ok(())
}
