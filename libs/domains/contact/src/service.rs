use email::{
    ComposeParams, Delivery, DispatchRequest, Dispatcher, Mailer, SecretSource, compose_message,
};
use tokio::time::Instant;
use tracing::{debug, instrument};

use crate::config::ContactConfig;
use crate::error::ContactResult;
use crate::models::{ContactForm, ContactSubmission};

/// Service layer for contact submissions
pub struct ContactService<S: SecretSource, M: Mailer> {
    secrets: S,
    dispatcher: Dispatcher<M>,
    config: ContactConfig,
}

impl<S: SecretSource, M: Mailer> ContactService<S, M> {
    pub fn new(secrets: S, mailer: M, config: ContactConfig) -> Self {
        let dispatcher = Dispatcher::new(mailer).with_attempt_timeout(config.attempt_timeout);
        Self {
            secrets,
            dispatcher,
            config,
        }
    }

    pub fn config(&self) -> &ContactConfig {
        &self.config
    }

    /// Validate a form and relay it.
    ///
    /// Validation runs before any secret lookup or network work. The provider
    /// registry is loaded per call and only read afterwards.
    #[instrument(skip_all)]
    pub async fn submit(
        &self,
        form: ContactForm,
        deadline: Option<Instant>,
    ) -> ContactResult<Delivery> {
        let submission = ContactSubmission::from_form(&form)?;

        let sender = self.secrets.fetch_secret(&self.config.user_secret).await?;
        let secret = self.secrets.fetch_secret(&self.config.pass_secret).await?;
        let registry = self.config.registry.load().await?;
        debug!(providers = ?registry.names(), "Provider registry loaded");

        let body = submission.email_body();
        let message = compose_message(ComposeParams {
            from: sender.trim(),
            to: &self.config.recipient,
            reply_to: Some(&submission.email),
            subject: &self.config.subject,
            body: &body,
        })?;

        let mut request = DispatchRequest::new(
            message,
            sender,
            secret,
            self.config.recipient.as_str(),
            &self.config.providers,
        );
        if let Some(deadline) = deadline {
            request = request.with_deadline(deadline);
        }

        Ok(self.dispatcher.dispatch(&request, &registry).await?)
    }
}
