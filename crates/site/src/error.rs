//! Unified error handling with Sentry integration.
//!
//! Handlers return `Result<T, AppError>`. Every error renders as the same
//! JSON envelope the form endpoints use for success, with `success: false`.
//! Server errors are captured to Sentry before responding.

use axum::{
    Json,
    extract::rejection::{FormRejection, JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::routes::ApiResponse;
use crate::services::IntakeError;
use crate::services::auth::AuthError;

/// Message shown for any failure the visitor cannot fix.
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

/// Application-level error type for the site.
#[derive(Debug, Error)]
pub enum AppError {
    /// Contact or newsletter intake failed.
    #[error("Intake error: {0}")]
    Intake(#[from] IntakeError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

macro_rules! bad_request_from_rejection {
    ($($rejection:ty),+) => {
        $(
            impl From<$rejection> for AppError {
                fn from(rejection: $rejection) -> Self {
                    Self::BadRequest(rejection.body_text())
                }
            }
        )+
    };
}

bad_request_from_rejection!(FormRejection, JsonRejection, PathRejection, QueryRejection);

impl AppError {
    fn is_server_error(&self) -> bool {
        match self {
            Self::Intake(IntakeError::Storage(_)) | Self::Internal(_) => true,
            Self::Database(RepositoryError::NotFound) => false,
            Self::Database(_) => true,
            Self::Auth(err) => matches!(
                err,
                AuthError::Repository(_) | AuthError::PasswordHash | AuthError::Session(_)
            ),
            _ => false,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Intake(IntakeError::Validation(_)) | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Intake(IntakeError::AlreadySubscribed) => StatusCode::CONFLICT,
            Self::Auth(AuthError::InvalidCredentials) | Self::Unauthorized(_) => {
                StatusCode::UNAUTHORIZED
            }
            Self::Auth(AuthError::WeakPassword(_)) => StatusCode::BAD_REQUEST,
            Self::Database(RepositoryError::NotFound) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Intake(IntakeError::Storage(_))
            | Self::Auth(_)
            | Self::Database(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The client-facing message. Internal details never leave the server.
    fn public_message(&self) -> String {
        match self {
            Self::Intake(IntakeError::Validation(errors)) => errors.to_string(),
            Self::Intake(IntakeError::AlreadySubscribed) => {
                "Email is already subscribed".to_string()
            }
            Self::Auth(AuthError::InvalidCredentials) => {
                "Invalid username or password".to_string()
            }
            Self::Auth(AuthError::WeakPassword(msg)) => msg.clone(),
            Self::Unauthorized(_) => "Unauthorized".to_string(),
            Self::Database(RepositoryError::NotFound) => "Not found".to_string(),
            Self::NotFound(what) => format!("{what} not found"),
            Self::BadRequest(msg) => msg.clone(),
            Self::Intake(IntakeError::Storage(_))
            | Self::Auth(_)
            | Self::Database(_)
            | Self::Internal(_) => GENERIC_FAILURE.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        (
            self.status(),
            Json(ApiResponse::<()>::failure(self.public_message())),
        )
            .into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context for the logged-in admin.
pub fn set_sentry_user(user_id: &impl ToString, username: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            username: Some(username.to_string()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
