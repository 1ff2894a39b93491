//! Newsletter subscription route handler.

use axum::{Json, extract::State};
use serde::Deserialize;
use tracing::instrument;

use crate::error::Result;
use crate::routes::ApiResponse;
use crate::routes::extract::ApiForm;
use crate::state::AppState;

pub const SUBSCRIBED: &str = "Successfully subscribed to the newsletter!";

/// Newsletter subscription form data.
#[derive(Debug, Deserialize)]
pub struct SubscribeForm {
    #[serde(default)]
    pub email: String,
}

/// Subscribe to the newsletter.
///
/// POST /api/newsletter
///
/// An address that is already active gets a 409; one that unsubscribed
/// earlier is reactivated.
#[instrument(skip_all)]
pub async fn subscribe(
    State(state): State<AppState>,
    ApiForm(form): ApiForm<SubscribeForm>,
) -> Result<Json<ApiResponse<()>>> {
    state.intake().subscribe_newsletter(&form.email).await?;

    Ok(Json(ApiResponse::success(SUBSCRIBED, None)))
}
