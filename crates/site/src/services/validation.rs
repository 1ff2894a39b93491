//! Field validation for the contact and newsletter forms.
//!
//! Validation is pure and collects every failing field instead of stopping
//! at the first one, so the visitor sees all problems at once.

use core::fmt;

use serde::Deserialize;

use awalan_core::{Email, PhoneNumber, ServiceKind};

use crate::models::NewContactSubmission;

/// Longest accepted name, in characters.
pub const MAX_NAME_LENGTH: usize = 100;

/// Longest accepted email address (storage column width).
pub const MAX_EMAIL_LENGTH: usize = 100;

pub const NAME_REQUIRED: &str = "Name is required";
pub const NAME_TOO_LONG: &str = "Name must be at most 100 characters";
pub const PHONE_REQUIRED: &str = "Phone/WhatsApp number is required";
pub const PHONE_INVALID: &str = "Phone/WhatsApp number is invalid";
pub const SERVICE_REQUIRED: &str = "Service must be selected";
pub const SERVICE_UNKNOWN: &str = "Service is not recognised";
pub const MESSAGE_REQUIRED: &str = "Message is required";
pub const EMAIL_INVALID: &str = "Email format is invalid";
pub const NEWSLETTER_EMAIL_INVALID: &str = "Email is invalid";

/// Raw contact form fields as posted by the browser.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub message: String,
}

/// The human-readable messages for every field that failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<&'static str>);

impl ValidationErrors {
    /// The individual messages, in field order.
    #[must_use]
    pub fn messages(&self) -> &[&'static str] {
        &self.0
    }

    /// Whether a particular message is present.
    #[must_use]
    pub fn contains(&self, message: &str) -> bool {
        self.0.iter().any(|m| *m == message)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Validate a contact form.
///
/// Every field is trimmed. An empty email means "not provided"; the phone is
/// reduced to its digits.
///
/// # Errors
///
/// Returns every failing field's message if any field is invalid.
pub fn validate_contact(form: &ContactForm) -> Result<NewContactSubmission, ValidationErrors> {
    let mut errors = Vec::new();

    let name = form.name.trim();
    if name.is_empty() {
        errors.push(NAME_REQUIRED);
    } else if name.chars().count() > MAX_NAME_LENGTH {
        errors.push(NAME_TOO_LONG);
    }

    let phone = form.phone.trim();
    let phone = if phone.is_empty() {
        errors.push(PHONE_REQUIRED);
        None
    } else {
        PhoneNumber::parse(phone)
            .inspect_err(|_| errors.push(PHONE_INVALID))
            .ok()
    };

    let service = form.service.trim();
    let service = if service.is_empty() {
        errors.push(SERVICE_REQUIRED);
        None
    } else {
        service
            .parse::<ServiceKind>()
            .inspect_err(|_| errors.push(SERVICE_UNKNOWN))
            .ok()
    };

    let message = form.message.trim();
    if message.is_empty() {
        errors.push(MESSAGE_REQUIRED);
    }

    let email = form.email.trim();
    let email = if email.is_empty() {
        None
    } else {
        let parsed = parse_storable_email(email);
        if parsed.is_none() {
            errors.push(EMAIL_INVALID);
        }
        parsed
    };

    match (phone, service) {
        (Some(phone), Some(service)) if errors.is_empty() => Ok(NewContactSubmission {
            name: name.to_owned(),
            email,
            phone,
            service,
            message: message.to_owned(),
        }),
        _ => Err(ValidationErrors(errors)),
    }
}

/// Validate a newsletter signup. The email is required.
///
/// # Errors
///
/// Returns `Email is invalid` for a missing or malformed address.
pub fn validate_newsletter(email: &str) -> Result<Email, ValidationErrors> {
    parse_storable_email(email).ok_or_else(|| ValidationErrors(vec![NEWSLETTER_EMAIL_INVALID]))
}

fn parse_storable_email(raw: &str) -> Option<Email> {
    Email::parse_normalized(raw)
        .ok()
        .filter(|email| email.as_str().len() <= MAX_EMAIL_LENGTH)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid_form() -> ContactForm {
        ContactForm {
            name: "Budi".to_string(),
            email: String::new(),
            phone: "081234567890".to_string(),
            service: "logo-only".to_string(),
            message: "Butuh logo".to_string(),
        }
    }

    #[test]
    fn test_valid_contact() {
        let contact = validate_contact(&valid_form()).unwrap();
        assert_eq!(contact.name, "Budi");
        assert_eq!(contact.phone.as_str(), "081234567890");
        assert_eq!(contact.service, ServiceKind::LogoOnly);
        assert!(contact.email.is_none());
    }

    #[test]
    fn test_fields_are_trimmed_and_normalized() {
        let form = ContactForm {
            name: "  Budi Santoso ".to_string(),
            email: " Budi@Example.com ".to_string(),
            phone: " +62 812-3456-7890 ".to_string(),
            service: " paket-umkm ".to_string(),
            message: "\nHalo\n".to_string(),
        };
        let contact = validate_contact(&form).unwrap();
        assert_eq!(contact.name, "Budi Santoso");
        assert_eq!(contact.email.unwrap().as_str(), "budi@example.com");
        assert_eq!(contact.phone.as_str(), "6281234567890");
        assert_eq!(contact.service, ServiceKind::PaketUmkm);
        assert_eq!(contact.message, "Halo");
    }

    #[test]
    fn test_missing_fields_all_reported() {
        let errors = validate_contact(&ContactForm::default()).unwrap_err();
        assert_eq!(
            errors.messages(),
            &[
                NAME_REQUIRED,
                PHONE_REQUIRED,
                SERVICE_REQUIRED,
                MESSAGE_REQUIRED
            ]
        );
        assert_eq!(
            errors.to_string(),
            "Name is required, Phone/WhatsApp number is required, \
             Service must be selected, Message is required"
        );
    }

    #[test]
    fn test_whitespace_only_counts_as_missing() {
        let form = ContactForm {
            name: "   ".to_string(),
            message: "\t".to_string(),
            ..valid_form()
        };
        let errors = validate_contact(&form).unwrap_err();
        assert_eq!(errors.messages(), &[NAME_REQUIRED, MESSAGE_REQUIRED]);
    }

    #[test]
    fn test_invalid_phone_reported_alone() {
        for phone in ["12345", "0215551234", "+1 415 555 0100", "abc"] {
            let form = ContactForm {
                phone: phone.to_string(),
                ..valid_form()
            };
            let errors = validate_contact(&form).unwrap_err();
            assert_eq!(errors.messages(), &[PHONE_INVALID], "phone {phone:?}");
        }
    }

    #[test]
    fn test_unknown_service() {
        let form = ContactForm {
            service: "website".to_string(),
            ..valid_form()
        };
        let errors = validate_contact(&form).unwrap_err();
        assert_eq!(errors.messages(), &[SERVICE_UNKNOWN]);
    }

    #[test]
    fn test_name_too_long() {
        let form = ContactForm {
            name: "a".repeat(101),
            ..valid_form()
        };
        assert!(validate_contact(&form).unwrap_err().contains(NAME_TOO_LONG));

        let form = ContactForm {
            name: "é".repeat(100),
            ..valid_form()
        };
        assert!(validate_contact(&form).is_ok());
    }

    #[test]
    fn test_invalid_optional_email() {
        for email in ["not-an-email", "budi@", "budi@localhost"] {
            let form = ContactForm {
                email: email.to_string(),
                ..valid_form()
            };
            let errors = validate_contact(&form).unwrap_err();
            assert_eq!(errors.messages(), &[EMAIL_INVALID], "email {email:?}");
        }
    }

    #[test]
    fn test_newsletter_email() {
        assert_eq!(
            validate_newsletter(" Sari@Example.COM ").unwrap().as_str(),
            "sari@example.com"
        );

        for email in ["", "not-an-email", "a@b"] {
            let errors = validate_newsletter(email).unwrap_err();
            assert_eq!(errors.to_string(), NEWSLETTER_EMAIL_INVALID);
        }
    }

    #[test]
    fn test_email_longer_than_storage_rejected() {
        let long = format!("{}@example.com", "a".repeat(95));
        assert!(validate_newsletter(&long).is_err());
    }
}
