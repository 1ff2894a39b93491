//! Read-only admin dashboard.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::models::{ContactSubmission, NewsletterSubscriber};
use crate::state::AppState;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// A contact row, pre-formatted for display.
pub struct ContactRow {
    pub id: i32,
    pub name: String,
    pub email: Option<String>,
    pub phone: String,
    pub whatsapp_link: String,
    pub service: &'static str,
    pub message: String,
    pub status: &'static str,
    pub created_at: String,
}

impl From<ContactSubmission> for ContactRow {
    fn from(contact: ContactSubmission) -> Self {
        Self {
            id: contact.id.as_i32(),
            email: contact.email.map(awalan_core::Email::into_inner),
            whatsapp_link: contact.phone.whatsapp_link(),
            phone: contact.phone.international(),
            service: contact.service.label(),
            status: contact.status.as_str(),
            created_at: contact.created_at.format(DATE_FORMAT).to_string(),
            name: contact.name,
            message: contact.message,
        }
    }
}

/// A subscriber row, pre-formatted for display.
pub struct SubscriberRow {
    pub email: String,
    pub subscribed_at: String,
    pub active: bool,
}

impl From<NewsletterSubscriber> for SubscriberRow {
    fn from(subscriber: NewsletterSubscriber) -> Self {
        Self {
            email: subscriber.email.into_inner(),
            subscribed_at: subscriber.subscribed_at.format(DATE_FORMAT).to_string(),
            active: subscriber.active,
        }
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "admin/dashboard.html")]
pub struct DashboardTemplate {
    pub username: String,
    pub contacts: Vec<ContactRow>,
    pub subscribers: Vec<SubscriberRow>,
}

/// GET /admin
#[instrument(skip_all, fields(admin = %admin.username))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<DashboardTemplate> {
    let config = state.config();
    let contacts = state.contacts().list_recent(config.contact_list_limit).await?;
    let subscribers = state
        .subscribers()
        .list_recent(config.subscriber_list_limit)
        .await?;

    Ok(DashboardTemplate {
        username: admin.username,
        contacts: contacts.into_iter().map(ContactRow::from).collect(),
        subscribers: subscribers.into_iter().map(SubscriberRow::from).collect(),
    })
}
