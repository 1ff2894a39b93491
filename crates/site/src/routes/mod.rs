//! HTTP route handlers for the site.
//!
//! # Route Structure
//!
//! ```text
//! # Intake (form-encoded, JSON envelope)
//! POST /api/contact                     - Contact form submission
//! POST /api/newsletter                  - Newsletter signup
//!
//! # Admin API (requires auth, 401 JSON otherwise)
//! GET  /api/admin/contacts?limit=       - Recent contact submissions
//! GET  /api/admin/subscribers?limit=    - Recent newsletter subscribers
//! POST /api/admin/contacts/{id}/status  - Change a submission's status
//!
//! # Admin pages
//! GET  /admin/login                     - Login page
//! POST /admin/login                     - Login action
//! POST /admin/logout                    - Logout action
//! GET  /admin                           - Dashboard (requires auth)
//!
//! # Newsletter
//! GET  /newsletter/unsubscribe          - Signed unsubscribe link
//! ```

pub mod admin;
pub mod auth;
pub mod contact;
pub mod dashboard;
pub mod extract;
pub mod newsletter;
pub mod unsubscribe;

use axum::{
    Router,
    routing::{get, post},
};
use serde::Serialize;

use crate::services::unsubscribe::UNSUBSCRIBE_PATH;
use crate::state::AppState;

/// JSON envelope shared by every API endpoint.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Successful response carrying a message and optional data.
    pub fn success(message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data,
        }
    }

    /// Successful response carrying only data.
    pub const fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    /// Failed response with a user-facing message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
        }
    }
}

/// Create the admin API routes router.
pub fn admin_api_routes() -> Router<AppState> {
    Router::new()
        .route("/contacts", get(admin::list_contacts))
        .route("/contacts/{id}/status", post(admin::update_contact_status))
        .route("/subscribers", get(admin::list_subscribers))
}

/// Create the admin page routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin", get(dashboard::index))
        .route("/admin/login", get(auth::login_page).post(auth::login))
        .route("/admin/logout", post(auth::logout))
}

/// Create all routes for the site.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/contact", post(contact::submit))
        .route("/api/newsletter", post(newsletter::subscribe))
        .nest("/api/admin", admin_api_routes())
        .merge(admin_routes())
        .route(UNSUBSCRIBE_PATH, get(unsubscribe::unsubscribe))
}
