use axum::{
    Form, Router,
    extract::{State, rejection::FormRejection},
    routing::post,
};
use email::{Mailer, SecretSource};
use std::sync::Arc;
use tokio::time::Instant;
use tracing::debug;

use crate::error::{ContactError, ContactResult, SUCCESS_MESSAGE};
use crate::models::ContactForm;
use crate::service::ContactService;

/// Relay a submitted contact form
///
/// An unreadable body is handled as an empty form, so it fails validation
/// like any other submission with missing fields.
pub async fn submit<S: SecretSource, M: Mailer>(
    State(service): State<Arc<ContactService<S, M>>>,
    form: Result<Form<ContactForm>, FormRejection>,
) -> ContactResult<&'static str> {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            debug!(rejection = %rejection, "Unreadable form body");
            ContactForm::default()
        }
    };

    let deadline = Instant::now() + service.config().request_timeout;
    service.submit(form, Some(deadline)).await?;

    Ok(SUCCESS_MESSAGE)
}

/// Any method other than POST
pub async fn method_not_allowed() -> ContactError {
    ContactError::MethodNotAllowed
}

/// Create the contact router, mounted at `/`
pub fn router<S, M>(service: ContactService<S, M>) -> Router
where
    S: SecretSource + 'static,
    M: Mailer + 'static,
{
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", post(submit::<S, M>).fallback(method_not_allowed))
        .with_state(shared_service)
}
