use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::submit::{Receipt, SubmitError, Submission, Submitter};

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 100;
pub const MESSAGE_MAX_CHARS: usize = 1000;

/// # Panics
///
/// Panics if the compiled-in pattern is invalid.
fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid regex pattern")
    })
}

/// The standalone "get in touch" form. Unlike the wizard's contact step it
/// checks formats and lengths, and the message is mandatory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    Name,
    Email,
    Phone,
    Message,
}

impl ContactField {
    pub fn label_key(self) -> &'static str {
        match self {
            ContactField::Name => "fields.name",
            ContactField::Email => "fields.email",
            ContactField::Phone => "fields.phone",
            ContactField::Message => "fields.message",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContactError {
    #[error("name is required")]
    NameRequired,
    #[error("name must be between 2 and 100 characters")]
    NameLength,
    #[error("email is required")]
    EmailRequired,
    #[error("email must look like name@domain.tld")]
    EmailFormat,
    #[error("phone is required")]
    PhoneRequired,
    #[error("message is required")]
    MessageRequired,
    #[error("message must be at most 1000 characters")]
    MessageTooLong,
}

impl ContactError {
    pub fn field(&self) -> ContactField {
        match self {
            ContactError::NameRequired | ContactError::NameLength => ContactField::Name,
            ContactError::EmailRequired | ContactError::EmailFormat => ContactField::Email,
            ContactError::PhoneRequired => ContactField::Phone,
            ContactError::MessageRequired | ContactError::MessageTooLong => ContactField::Message,
        }
    }

    pub fn message_key(&self) -> &'static str {
        match self {
            ContactError::NameRequired => "contact.errors.name_required",
            ContactError::NameLength => "contact.errors.name_length",
            ContactError::EmailRequired => "contact.errors.email_required",
            ContactError::EmailFormat => "contact.errors.email_format",
            ContactError::PhoneRequired => "contact.errors.phone_required",
            ContactError::MessageRequired => "contact.errors.message_required",
            ContactError::MessageTooLong => "contact.errors.message_too_long",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendError {
    #[error("{} field(s) need attention", .0.len())]
    Invalid(Vec<ContactError>),
    #[error(transparent)]
    Rejected(#[from] SubmitError),
}

impl ContactForm {
    /// At most one error per field, in form order.
    pub fn validate(&self) -> Result<(), Vec<ContactError>> {
        let mut errors = Vec::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.push(ContactError::NameRequired);
        } else if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&name.chars().count()) {
            errors.push(ContactError::NameLength);
        }

        let email = self.email.trim();
        if email.is_empty() {
            errors.push(ContactError::EmailRequired);
        } else if !email_pattern().is_match(email) {
            errors.push(ContactError::EmailFormat);
        }

        if self.phone.trim().is_empty() {
            errors.push(ContactError::PhoneRequired);
        }

        if self.message.trim().is_empty() {
            errors.push(ContactError::MessageRequired);
        } else if self.message.chars().count() > MESSAGE_MAX_CHARS {
            errors.push(ContactError::MessageTooLong);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Validates and submits. The form is cleared only when the backend
    /// accepts it; on any failure the typed values stay.
    pub async fn send(&mut self, submitter: &dyn Submitter) -> Result<Receipt, SendError> {
        if let Err(errors) = self.validate() {
            debug!(count = errors.len(), "contact form invalid");
            return Err(SendError::Invalid(errors));
        }

        match submitter.submit(Submission::Contact(self.clone())).await {
            Ok(receipt) => {
                self.clear();
                Ok(receipt)
            }
            Err(e) => {
                warn!(error = %e, "contact message not delivered");
                Err(e.into())
            }
        }
    }
}
