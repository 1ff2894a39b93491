//! Persistence for contact submissions, newsletter subscribers and admins.
//!
//! # Database: `PostgreSQL`, schema `site`
//!
//! ## Tables
//!
//! - `contact_submission` - Contact form submissions (never deleted)
//! - `newsletter_subscriber` - Newsletter emails (UNIQUE email)
//! - `admin_user` - Admin logins (argon2 hashes)
//! - `session` - Tower-sessions storage
//!
//! # Migrations
//!
//! Migrations are stored in `crates/site/migrations/` and run via:
//! ```bash
//! cargo run -p awalan-cli -- migrate
//! ```
//!
//! # Backends
//!
//! Handlers only see the repository traits below. [`Repositories::postgres`]
//! is the production wiring; [`Repositories::in_memory`] backs the tests.

pub mod admin_users;
pub mod contacts;
pub mod memory;
pub mod subscribers;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use awalan_core::{AdminUserId, ContactId, ContactStatus, Email, SubscriberId};

use crate::models::{AdminUser, ContactSubmission, NewContactSubmission, NewsletterSubscriber};

pub use admin_users::PgAdminUserRepository;
pub use contacts::PgContactRepository;
pub use memory::InMemoryStore;
pub use subscribers::PgSubscriberRepository;

/// Upper bound for any list request.
pub const MAX_LIST_LIMIT: i64 = 500;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Clamp a requested list size to `1..=MAX_LIST_LIMIT`.
#[must_use]
pub const fn clamp_limit(limit: i64) -> i64 {
    if limit < 1 {
        1
    } else if limit > MAX_LIST_LIMIT {
        MAX_LIST_LIMIT
    } else {
        limit
    }
}

/// Map a unique violation to `Conflict`, anything else to `Database`.
pub(crate) fn conflict_or_database(err: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = err
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(format!("{what} already exists"));
    }
    RepositoryError::Database(err)
}

/// Storage for contact form submissions.
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Store a validated submission with status `new`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    async fn save(&self, contact: &NewContactSubmission) -> Result<ContactId, RepositoryError>;

    /// Most recent submissions first, at most `limit` (clamped).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored row is invalid.
    async fn list_recent(&self, limit: i64) -> Result<Vec<ContactSubmission>, RepositoryError>;

    /// Change the handling status of a submission and bump `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no submission has this ID.
    async fn update_status(
        &self,
        id: ContactId,
        status: ContactStatus,
    ) -> Result<ContactSubmission, RepositoryError>;

    /// Check that the backend is reachable.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the backend is down.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Storage for newsletter subscribers.
#[async_trait]
pub trait SubscriberRepository: Send + Sync {
    /// Subscribe an email address.
    ///
    /// Checks for an existing row first. An inactive subscriber is
    /// reactivated and keeps its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already an active
    /// subscriber (nothing is written).
    async fn subscribe(&self, email: &Email) -> Result<SubscriberId, RepositoryError>;

    /// Most recent subscribers first, at most `limit` (clamped).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    async fn list_recent(
        &self,
        limit: i64,
    ) -> Result<Vec<NewsletterSubscriber>, RepositoryError>;

    /// Mark a subscriber inactive. Returns `false` if there was no active
    /// subscriber with this email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    async fn deactivate(&self, email: &Email) -> Result<bool, RepositoryError>;
}

/// Storage for admin logins.
#[async_trait]
pub trait AdminUserRepository: Send + Sync {
    /// Look up an admin and their password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<(AdminUser, String)>, RepositoryError>;

    /// Create an admin from an already-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username is taken.
    async fn create(
        &self,
        username: &str,
        password_hash: &str,
        email: Option<&Email>,
    ) -> Result<AdminUser, RepositoryError>;

    /// Set `last_login` to now.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the admin does not exist.
    async fn record_login(&self, id: AdminUserId) -> Result<(), RepositoryError>;
}

/// The repository set the application runs against.
#[derive(Clone)]
pub struct Repositories {
    pub contacts: Arc<dyn ContactRepository>,
    pub subscribers: Arc<dyn SubscriberRepository>,
    pub admins: Arc<dyn AdminUserRepository>,
}

impl Repositories {
    /// `PostgreSQL`-backed repositories sharing one pool.
    #[must_use]
    pub fn postgres(pool: &PgPool) -> Self {
        Self {
            contacts: Arc::new(PgContactRepository::new(pool.clone())),
            subscribers: Arc::new(PgSubscriberRepository::new(pool.clone())),
            admins: Arc::new(PgAdminUserRepository::new(pool.clone())),
        }
    }

    /// Repositories backed by a single in-memory store.
    #[must_use]
    pub fn in_memory(store: &InMemoryStore) -> Self {
        Self {
            contacts: Arc::new(store.clone()),
            subscribers: Arc::new(store.clone()),
            admins: Arc::new(store.clone()),
        }
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
