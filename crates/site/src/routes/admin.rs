//! Admin data API.
//!
//! Every handler takes [`RequireAdmin`], so unauthenticated requests get the
//! 401 envelope and never reach the repositories.

use axum::{Json, extract::State};
use serde::Deserialize;
use tracing::instrument;

use awalan_core::{ContactId, ContactStatus};

use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{ContactSubmission, NewsletterSubscriber};
use crate::routes::ApiResponse;
use crate::routes::extract::{ApiJson, ApiPath, ApiQuery};
use crate::state::AppState;

/// `?limit=` query for the list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

/// Body for a status change.
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

/// Most recent contact submissions.
///
/// GET /api/admin/contacts?limit=
#[instrument(skip(state, admin), fields(admin = %admin.username))]
pub async fn list_contacts(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Json<ApiResponse<Vec<ContactSubmission>>>> {
    let limit = query.limit.unwrap_or(state.config().contact_list_limit);
    let contacts = state.contacts().list_recent(limit).await?;
    Ok(Json(ApiResponse::data(contacts)))
}

/// Most recent newsletter subscribers.
///
/// GET /api/admin/subscribers?limit=
#[instrument(skip(state, admin), fields(admin = %admin.username))]
pub async fn list_subscribers(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Json<ApiResponse<Vec<NewsletterSubscriber>>>> {
    let limit = query.limit.unwrap_or(state.config().subscriber_list_limit);
    let subscribers = state.subscribers().list_recent(limit).await?;
    Ok(Json(ApiResponse::data(subscribers)))
}

/// Move a submission to another handling status.
///
/// POST /api/admin/contacts/{id}/status
#[instrument(skip(state, admin, update), fields(admin = %admin.username))]
pub async fn update_contact_status(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiPath(id): ApiPath<i32>,
    ApiJson(update): ApiJson<StatusUpdate>,
) -> Result<Json<ApiResponse<ContactSubmission>>> {
    let status = update
        .status
        .parse::<ContactStatus>()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let contact = state
        .contacts()
        .update_status(ContactId::new(id), status)
        .await?;

    tracing::info!(contact_id = id, status = status.as_str(), "Contact status updated");
    Ok(Json(ApiResponse::data(contact)))
}
