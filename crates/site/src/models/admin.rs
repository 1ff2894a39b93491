//! Admin user domain type.

use chrono::{DateTime, Utc};

use awalan_core::{AdminUserId, Email};

/// An admin user (domain type).
///
/// The password hash is deliberately not part of this type; it is only
/// handed out by [`crate::db::AdminUserRepository::find_by_username`].
#[derive(Debug, Clone)]
pub struct AdminUser {
    /// Unique admin user ID.
    pub id: AdminUserId,
    /// Login name.
    pub username: String,
    /// Optional contact address.
    pub email: Option<Email>,
    /// Last successful login.
    pub last_login: Option<DateTime<Utc>>,
    /// When the admin was created.
    pub created_at: DateTime<Utc>,
}
