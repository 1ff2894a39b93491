//! Admin user management commands.
//!
//! # Usage
//!
//! ```bash
//! # Password from the environment (preferred, keeps it out of shell history)
//! AWALAN_ADMIN_PASSWORD='...' awalan-cli admin create -u admin -e admin@example.com
//!
//! # Password as an argument
//! awalan-cli admin create -u admin -p '...'
//! ```
//!
//! # Environment Variables
//!
//! - `SITE_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string
//! - `AWALAN_ADMIN_PASSWORD` - Password for `admin create`

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use thiserror::Error;

use awalan_core::{AdminUserId, Email};
use awalan_site::db::{AdminUserRepository, PgAdminUserRepository, RepositoryError};
use awalan_site::services::auth::{AuthError, hash_password, validate_password};

/// Longest accepted username (storage column width).
const MAX_USERNAME_LENGTH: usize = 50;

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: SITE_DATABASE_URL (or DATABASE_URL)")]
    MissingDatabaseUrl,

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Repository error.
    #[error("Repository error: {0}")]
    Repository(RepositoryError),

    /// Invalid username.
    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// Password rejected or could not be hashed.
    #[error("{0}")]
    Password(#[from] AuthError),

    /// User already exists.
    #[error("Admin user already exists with username: {0}")]
    UserExists(String),
}

/// Create a new admin user.
///
/// # Returns
///
/// The ID of the created admin user.
///
/// # Errors
///
/// Returns `AdminError` if an argument is invalid, the username is taken or
/// the database is unreachable.
pub async fn create_user(
    username: &str,
    password: &SecretString,
    email: Option<&str>,
) -> Result<AdminUserId, AdminError> {
    let username = validate_username(username)?;
    let email = email
        .map(Email::parse_normalized)
        .transpose()
        .map_err(|e| AdminError::InvalidEmail(e.to_string()))?;
    validate_password(password.expose_secret())?;

    let database_url = super::database_url().ok_or(AdminError::MissingDatabaseUrl)?;

    tracing::info!("Connecting to site database...");
    let pool = PgPool::connect(&database_url).await?;
    let admins = PgAdminUserRepository::new(pool);

    tracing::info!("Creating admin user: {}", username);
    let password_hash = hash_password(password.expose_secret())?;

    let admin = admins
        .create(username, &password_hash, email.as_ref())
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => AdminError::UserExists(username.to_owned()),
            other => AdminError::Repository(other),
        })?;

    tracing::info!(
        "Admin user created successfully! ID: {}, Username: {}",
        admin.id,
        admin.username
    );

    Ok(admin.id)
}

/// Trim and check a username.
fn validate_username(username: &str) -> Result<&str, AdminError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(AdminError::InvalidUsername("must not be empty".to_owned()));
    }
    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(AdminError::InvalidUsername(format!(
            "must be at most {MAX_USERNAME_LENGTH} characters"
        )));
    }
    if username.chars().any(char::is_whitespace) {
        return Err(AdminError::InvalidUsername(
            "must not contain whitespace".to_owned(),
        ));
    }
    Ok(username)
}
