//! Signed newsletter unsubscribe link.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use awalan_core::Email;

use crate::error::Result;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct UnsubscribeQuery {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub tag: String,
}

/// Result page. `email` is `None` when the link did not check out.
#[derive(Template, WebTemplate)]
#[template(path = "newsletter/unsubscribed.html")]
pub struct UnsubscribedTemplate {
    pub email: Option<String>,
    pub site_url: String,
}

/// GET /newsletter/unsubscribe?email=&tag=
///
/// Unsubscribing twice is harmless; the second visit shows the same page.
#[instrument(skip_all)]
pub async fn unsubscribe(
    State(state): State<AppState>,
    Query(query): Query<UnsubscribeQuery>,
) -> Result<Response> {
    let site_url = state.config().base_url.clone();

    let verified = Email::parse_normalized(&query.email)
        .ok()
        .filter(|email| state.signer().verify(email, &query.tag));

    let Some(email) = verified else {
        tracing::info!("Rejected unsubscribe link with bad signature");
        return Ok((
            StatusCode::BAD_REQUEST,
            UnsubscribedTemplate {
                email: None,
                site_url,
            },
        )
            .into_response());
    };

    if state.subscribers().deactivate(&email).await? {
        tracing::info!(email = %email, "Subscriber unsubscribed");
    }

    Ok(UnsubscribedTemplate {
        email: Some(email.into_inner()),
        site_url,
    }
    .into_response())
}
