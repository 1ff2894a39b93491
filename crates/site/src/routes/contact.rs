//! Contact form route handler.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use crate::error::Result;
use crate::routes::ApiResponse;
use crate::routes::extract::ApiForm;
use crate::services::ContactReceipt;
use crate::services::validation::ContactForm;
use crate::state::AppState;

pub const CONTACT_SENT: &str = "Message sent! We will contact you soon.";

/// Echo of the accepted submission.
#[derive(Debug, Serialize)]
pub struct ContactEcho {
    pub name: String,
    pub phone: String,
    pub service: String,
}

impl From<&ContactReceipt> for ContactEcho {
    fn from(receipt: &ContactReceipt) -> Self {
        Self {
            name: receipt.contact.name.clone(),
            phone: receipt.contact.phone.as_str().to_owned(),
            service: receipt.contact.service.as_str().to_owned(),
        }
    }
}

/// Submit the contact form.
///
/// POST /api/contact
#[instrument(skip_all)]
pub async fn submit(
    State(state): State<AppState>,
    ApiForm(form): ApiForm<ContactForm>,
) -> Result<Json<ApiResponse<ContactEcho>>> {
    let receipt = state.intake().submit_contact(&form).await?;

    Ok(Json(ApiResponse::success(
        CONTACT_SENT,
        Some(ContactEcho::from(&receipt)),
    )))
}
