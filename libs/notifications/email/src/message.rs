//! Plain-text message rendering with lettre's builder

use crate::error::ComposeError;
use lettre::message::{header::ContentType, Mailbox, Message};
use tracing::debug;
use uuid::Uuid;

/// Inputs for [`compose_message`].
#[derive(Debug, Clone, Copy)]
pub struct ComposeParams<'a> {
    pub from: &'a str,
    pub to: &'a str,
    pub reply_to: Option<&'a str>,
    pub subject: &'a str,
    pub body: &'a str,
}

/// Render a complete message (headers + body) ready for `send_raw`.
///
/// Non-ASCII header values are RFC 2047 encoded and the body gets the
/// cheapest valid transfer encoding. A `reply_to` that is not a valid
/// ASCII mailbox is left out of the message.
pub fn compose_message(params: ComposeParams<'_>) -> Result<Vec<u8>, ComposeError> {
    let from = mailbox("from", params.from)?;
    let to = mailbox("to", params.to)?;

    let mut builder = Message::builder()
        .message_id(Some(message_id(&from)))
        .from(from)
        .to(to)
        .subject(single_line(params.subject));

    if let Some(reply_to) = params.reply_to {
        // Address headers cannot be RFC 2047 encoded
        if !reply_to.is_ascii() {
            debug!("Dropping non-ASCII Reply-To");
        } else {
            match mailbox("reply_to", reply_to) {
                Ok(mailbox) => builder = builder.reply_to(mailbox),
                Err(e) => debug!(error = %e, "Dropping unusable Reply-To"),
            }
        }
    }

    let message = builder
        .header(ContentType::TEXT_PLAIN)
        .body(params.body.to_string())?;

    Ok(message.formatted())
}

fn mailbox(field: &'static str, address: &str) -> Result<Mailbox, ComposeError> {
    address
        .trim()
        .parse::<Mailbox>()
        .map_err(|e| ComposeError::Address {
            field,
            address: address.to_string(),
            details: e.to_string(),
        })
}

fn single_line(value: &str) -> String {
    value
        .chars()
        .map(|c| if c == '\r' || c == '\n' { ' ' } else { c })
        .collect::<String>()
        .trim()
        .to_string()
}

/// `<uuid@sender-domain>`
fn message_id(from: &Mailbox) -> String {
    format!("<{}@{}>", Uuid::new_v4(), from.email.domain())
}
