//! Contact submission domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use awalan_core::{ContactId, ContactStatus, Email, PhoneNumber, ServiceKind};

/// A validated contact form submission that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContactSubmission {
    /// Submitter's name, trimmed.
    pub name: String,
    /// Optional reply address, normalized.
    pub email: Option<Email>,
    /// WhatsApp number, digits only.
    pub phone: PhoneNumber,
    /// Requested service package.
    pub service: ServiceKind,
    /// Free-form message, trimmed.
    pub message: String,
}

/// A stored contact submission.
///
/// Submissions are never deleted; admins move them through
/// [`ContactStatus`] and archive them when done.
#[derive(Debug, Clone, Serialize)]
pub struct ContactSubmission {
    pub id: ContactId,
    pub name: String,
    pub email: Option<Email>,
    pub phone: PhoneNumber,
    pub service: ServiceKind,
    pub message: String,
    pub status: ContactStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
