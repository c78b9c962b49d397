//! SMTP mailer using lettre

use super::{Mailer, SmtpAuth};
use crate::error::MailerError;
use async_trait::async_trait;
use lettre::{
    address::{Address, Envelope},
    transport::smtp::authentication::{Credentials, Mechanism},
    AsyncSmtpTransport, AsyncTransport, Tokio1Executor,
};
use tracing::debug;

/// Port that speaks TLS from the first byte; every other port upgrades with STARTTLS.
const IMPLICIT_TLS_PORT: u16 = 465;

/// Sends through a fresh lettre transport per attempt.
///
/// Transports are not pooled: each request makes at most one pass through
/// the provider list and endpoints differ between attempts.
#[derive(Debug, Clone, Default)]
pub struct SmtpMailer;

impl SmtpMailer {
    pub fn new() -> Self {
        Self
    }

    fn build_transport(
        host: &str,
        port: u16,
        auth: &SmtpAuth,
    ) -> Result<AsyncSmtpTransport<Tokio1Executor>, MailerError> {
        let builder = if port == IMPLICIT_TLS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?
        };

        Ok(builder
            .port(port)
            .credentials(Credentials::new(
                auth.username.clone(),
                auth.password.clone(),
            ))
            .authentication(vec![Mechanism::Plain, Mechanism::Login])
            .build())
    }

    fn envelope(from: &str, to: &str) -> Result<Envelope, MailerError> {
        let parse = |address: &str| {
            address
                .trim()
                .parse::<Address>()
                .map_err(|e| MailerError::Address {
                    address: address.to_string(),
                    details: e.to_string(),
                })
        };

        Envelope::new(Some(parse(from)?), vec![parse(to)?]).map_err(|e| MailerError::Address {
            address: to.to_string(),
            details: e.to_string(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(
        &self,
        host: &str,
        port: u16,
        auth: &SmtpAuth,
        from: &str,
        to: &str,
        body: &[u8],
    ) -> Result<(), MailerError> {
        let envelope = Self::envelope(from, to)?;
        let transport = Self::build_transport(host, port, auth)?;

        let response = transport.send_raw(&envelope, body).await?;

        debug!(
            host = %host,
            port = port,
            code = %response.code(),
            "SMTP server accepted message"
        );

        Ok(())
    }

    fn name(&self) -> &'static str {
        "smtp"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_from_valid_addresses() {
        let envelope = SmtpMailer::envelope("relay@example.com", " inbox@example.org ").unwrap();
        assert_eq!(envelope.from().unwrap().to_string(), "relay@example.com");
        assert_eq!(envelope.to()[0].to_string(), "inbox@example.org");
    }

    #[test]
    fn test_envelope_rejects_bad_address() {
        let err = SmtpMailer::envelope("not-an-address", "inbox@example.org").unwrap_err();
        assert!(matches!(err, MailerError::Address { ref address, .. } if address == "not-an-address"));
    }

    #[test]
    fn test_transport_builds_for_both_tls_modes() {
        let auth = SmtpAuth::new("user", "pass");
        assert!(SmtpMailer::build_transport("smtp.gmail.com", 587, &auth).is_ok());
        assert!(SmtpMailer::build_transport("smtp.gmail.com", 465, &auth).is_ok());
    }

    #[tokio::test]
    async fn test_send_with_bad_sender_fails_before_connecting() {
        let mailer = SmtpMailer::new();
        let auth = SmtpAuth::new("user", "pass");
        let result = mailer
            .send("smtp.invalid", 587, &auth, "no at sign", "inbox@example.org", b"body")
            .await;
        assert!(matches!(result, Err(MailerError::Address { .. })));
    }
}
