use serde::Deserialize;
use validator::Validate;

use crate::error::{ContactError, ContactResult};

/// Longest accepted message, in characters.
pub const MAX_MESSAGE_CHARS: u64 = 5000;

/// Raw form fields as posted. Absent fields read as empty.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
    /// Honeypot, left empty by real visitors
    pub website: String,
}

/// A submission that passed every check.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct ContactSubmission {
    pub name: String,
    #[validate(contains(pattern = "@"))]
    pub email: String,
    #[validate(length(max = MAX_MESSAGE_CHARS))]
    pub message: String,
}

impl ContactSubmission {
    /// Check a raw form.
    ///
    /// Rules run in a fixed order and the first one that fails decides the
    /// rejection: honeypot, required fields, message length, email shape.
    pub fn from_form(form: &ContactForm) -> ContactResult<Self> {
        if !form.website.is_empty() {
            return Err(ContactError::Spam);
        }

        let name = form.name.trim();
        let email = form.email.trim();
        let message = form.message.trim();
        if name.is_empty() || email.is_empty() || message.is_empty() {
            return Err(ContactError::MissingFields);
        }

        let submission = Self {
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
        };

        if let Err(errors) = submission.validate() {
            let fields = errors.field_errors();
            if fields.contains_key("message") {
                return Err(ContactError::MessageTooLong);
            }
            return Err(ContactError::InvalidEmail);
        }

        Ok(submission)
    }

    /// Plain-text body relayed to the site owner.
    pub fn email_body(&self) -> String {
        format!(
            "Name: {}\nEmail: {}\nMessage:\n{}",
            self.name, self.email, self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, email: &str, message: &str, website: &str) -> ContactForm {
        ContactForm {
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
            website: website.to_string(),
        }
    }

    #[test]
    fn test_valid_submission_is_trimmed() {
        let submission =
            ContactSubmission::from_form(&form(" Test User ", "test@user.com\n", "Hello!", ""))
                .unwrap();

        assert_eq!(submission.name, "Test User");
        assert_eq!(submission.email, "test@user.com");
        assert_eq!(submission.message, "Hello!");
    }

    #[test]
    fn test_honeypot_wins_over_every_other_rule() {
        let err = ContactSubmission::from_form(&form("", "", "", "http://spam.example")).unwrap_err();
        assert!(matches!(err, ContactError::Spam));

        let err = ContactSubmission::from_form(&form("A", "a@b.c", "hi", " ")).unwrap_err();
        assert!(matches!(err, ContactError::Spam));
    }

    #[test]
    fn test_blank_fields_are_missing() {
        for f in [
            form("", "a@b.c", "hi", ""),
            form("A", "   ", "hi", ""),
            form("A", "a@b.c", "\t\n", ""),
            ContactForm::default(),
        ] {
            let err = ContactSubmission::from_form(&f).unwrap_err();
            assert!(matches!(err, ContactError::MissingFields), "{:?}", f);
        }
    }

    #[test]
    fn test_message_length_counts_characters() {
        let limit = "é".repeat(MAX_MESSAGE_CHARS as usize);
        assert!(ContactSubmission::from_form(&form("A", "a@b.c", &limit, "")).is_ok());

        let over = "x".repeat(MAX_MESSAGE_CHARS as usize + 1);
        let err = ContactSubmission::from_form(&form("A", "a@b.c", &over, "")).unwrap_err();
        assert!(matches!(err, ContactError::MessageTooLong));
    }

    #[test]
    fn test_length_is_checked_before_email_shape() {
        let over = "x".repeat(MAX_MESSAGE_CHARS as usize + 1);
        let err = ContactSubmission::from_form(&form("A", "not-an-email", &over, "")).unwrap_err();
        assert!(matches!(err, ContactError::MessageTooLong));
    }

    #[test]
    fn test_email_requires_at_sign() {
        let err = ContactSubmission::from_form(&form("A", "user.example.com", "hi", "")).unwrap_err();
        assert!(matches!(err, ContactError::InvalidEmail));
    }

    #[test]
    fn test_email_body_format() {
        let submission =
            ContactSubmission::from_form(&form("Test User", "test@user.com", "Hello!", "")).unwrap();
        assert_eq!(
            submission.email_body(),
            "Name: Test User\nEmail: test@user.com\nMessage:\nHello!"
        );
    }
}
