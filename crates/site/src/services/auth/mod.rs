//! Admin authentication.
//!
//! Username and password login against argon2 hashes, with the logged-in
//! admin kept in the server-side session.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use secrecy::{ExposeSecret, SecretString};
use tower_sessions::Session;
use tracing::instrument;

use crate::db::AdminUserRepository;
use crate::middleware::auth::{current_admin, set_current_admin};
use crate::models::{AdminUser, CurrentAdmin};

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 12;

/// Verified against when the username is unknown, so both paths cost the
/// same. Its parameters must stay equal to `Argon2::default()`.
const DUMMY_PASSWORD_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$\
    gZiV/M1gPc22ElAH/Jh1Hw$\
    CWOrkoo7oJBQ/iyh7uJ0LO2aLEfrHwTWllSAxT0zRno";

/// Check a username/password pair.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` for an unknown username or a
/// wrong password, `AuthError::Repository` if the lookup fails.
#[instrument(skip(admins, password))]
pub async fn authenticate(
    admins: &dyn AdminUserRepository,
    username: &str,
    password: SecretString,
) -> Result<AdminUser, AuthError> {
    let (admin, expected_hash) = match admins.find_by_username(username.trim()).await? {
        Some((admin, hash)) => (Some(admin), hash),
        None => (None, DUMMY_PASSWORD_HASH.to_string()),
    };

    tokio::task::spawn_blocking(move || verify_password(password.expose_secret(), &expected_hash))
        .await
        .map_err(|_| AuthError::PasswordHash)??;

    admin.ok_or(AuthError::InvalidCredentials)
}

/// Log an admin in: check credentials, rotate the session ID, store the
/// admin in the session and record the login time.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` on bad credentials, or a
/// session/repository error.
pub async fn login(
    session: &Session,
    admins: &dyn AdminUserRepository,
    username: &str,
    password: SecretString,
) -> Result<CurrentAdmin, AuthError> {
    let admin = authenticate(admins, username, password).await?;

    // Fresh ID so a pre-login session cannot be fixated
    session.cycle_id().await?;
    let current = CurrentAdmin::from(&admin);
    set_current_admin(session, &current).await?;

    if let Err(e) = admins.record_login(admin.id).await {
        tracing::warn!(admin_id = %admin.id, error = %e, "Failed to record last login");
    }

    tracing::info!(admin_id = %admin.id, username = %admin.username, "Admin logged in");
    Ok(current)
}

/// Destroy the whole session.
///
/// # Errors
///
/// Returns `AuthError::Session` if the store cannot delete it.
pub async fn logout(session: &Session) -> Result<(), AuthError> {
    session.flush().await?;
    Ok(())
}

/// Whether the session belongs to a logged-in admin.
pub async fn is_authenticated(session: &Session) -> bool {
    current_admin(session).await.is_some()
}

/// Hash a password with argon2id and a random salt (PHC string).
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Reject passwords that are too short to be an admin password.
///
/// # Errors
///
/// Returns `AuthError::WeakPassword` describing the problem.
pub fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
