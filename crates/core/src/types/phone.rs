//! Indonesian mobile (WhatsApp) phone number type.

use core::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Country (`62`) or trunk (`0`) prefix, the `8` mobile marker, a non-zero
/// operator digit, then the rest of the subscriber number.
static MOBILE_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(62|0)8[1-9][0-9]{6,9}$").expect("Invalid regex"));

/// Errors that can occur when parsing a [`PhoneNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input contains no digits at all.
    #[error("phone number cannot be empty")]
    Empty,
    /// The normalized digits are shorter than [`PhoneNumber::MIN_DIGITS`].
    #[error("phone number must have at least {min} digits")]
    TooShort {
        /// Minimum number of digits.
        min: usize,
    },
    /// The digits do not form a local mobile number.
    #[error("phone number is not a valid mobile number")]
    InvalidFormat,
}

/// A normalized Indonesian mobile number.
///
/// Parsing strips every non-digit character (spaces, dashes, a leading `+`),
/// then requires the result to look like a local mobile number: `62` or `0`,
/// followed by `8`, a digit 1-9, and 6-9 more digits, with at least 10 digits
/// in total. The stored value is the digits only.
///
/// ## Examples
///
/// ```
/// use awalan_core::PhoneNumber;
///
/// assert_eq!(PhoneNumber::parse("0812-3456-7890").unwrap().as_str(), "081234567890");
/// assert_eq!(PhoneNumber::parse("+62 812 3456 7890").unwrap().as_str(), "6281234567890");
///
/// assert!(PhoneNumber::parse("021-555-1234").is_err()); // landline
/// assert!(PhoneNumber::parse("08123").is_err());        // too short
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Minimum number of digits after normalization.
    pub const MIN_DIGITS: usize = 10;

    /// Maximum stored length (matches the storage column).
    pub const MAX_LENGTH: usize = 20;

    /// Parse and normalize a phone number.
    ///
    /// # Errors
    ///
    /// Returns an error if the input has no digits, fewer than 10 digits, or
    /// does not match the local mobile-number shape.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let digits: String = s.chars().filter(char::is_ascii_digit).collect();

        if digits.is_empty() {
            return Err(PhoneError::Empty);
        }

        if digits.len() < Self::MIN_DIGITS {
            return Err(PhoneError::TooShort {
                min: Self::MIN_DIGITS,
            });
        }

        if !MOBILE_NUMBER_RE.is_match(&digits) {
            return Err(PhoneError::InvalidFormat);
        }

        Ok(Self(digits))
    }

    /// Returns the normalized digits.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the number in international form (`62...`), as used by
    /// `wa.me` links.
    #[must_use]
    pub fn international(&self) -> String {
        self.0
            .strip_prefix('0')
            .map_or_else(|| self.0.clone(), |rest| format!("62{rest}"))
    }

    /// Returns a `https://wa.me/...` chat link for this number.
    #[must_use]
    pub fn whatsapp_link(&self) -> String {
        format!("https://wa.me/{}", self.international())
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PhoneNumber {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trunk_prefix() {
        let phone = PhoneNumber::parse("081234567890").unwrap();
        assert_eq!(phone.as_str(), "081234567890");
    }

    #[test]
    fn test_parse_strips_formatting() {
        assert_eq!(
            PhoneNumber::parse("0858-1505-6990").unwrap().as_str(),
            "085815056990"
        );
        assert_eq!(
            PhoneNumber::parse("+62 858 1505 6990").unwrap().as_str(),
            "6285815056990"
        );
        assert_eq!(
            PhoneNumber::parse("(0812) 345 6789").unwrap().as_str(),
            "08123456789"
        );
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(PhoneNumber::parse(""), Err(PhoneError::Empty));
        assert_eq!(PhoneNumber::parse("call me"), Err(PhoneError::Empty));
    }

    #[test]
    fn test_parse_too_short() {
        // Matches the mobile pattern but has only 9 digits.
        assert_eq!(
            PhoneNumber::parse("081234567"),
            Err(PhoneError::TooShort { min: 10 })
        );
    }

    #[test]
    fn test_parse_rejects_non_mobile() {
        // Jakarta landline
        assert_eq!(
            PhoneNumber::parse("0215551234"),
            Err(PhoneError::InvalidFormat)
        );
        // Operator digit zero
        assert_eq!(
            PhoneNumber::parse("080123456789"),
            Err(PhoneError::InvalidFormat)
        );
        // Foreign country code
        assert_eq!(
            PhoneNumber::parse("+1 415 555 0100"),
            Err(PhoneError::InvalidFormat)
        );
        // Too many digits
        assert_eq!(
            PhoneNumber::parse("08123456789012"),
            Err(PhoneError::InvalidFormat)
        );
    }

    #[test]
    fn test_international() {
        let local = PhoneNumber::parse("085815056990").unwrap();
        assert_eq!(local.international(), "6285815056990");

        let intl = PhoneNumber::parse("6285815056990").unwrap();
        assert_eq!(intl.international(), "6285815056990");
    }

    #[test]
    fn test_whatsapp_link() {
        let phone = PhoneNumber::parse("081234567890").unwrap();
        assert_eq!(phone.whatsapp_link(), "https://wa.me/6281234567890");
    }
}
