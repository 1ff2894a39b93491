//! Newsletter subscriber domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;

use awalan_core::{Email, SubscriberId};

/// A newsletter subscriber.
///
/// The email is unique across all subscribers, active or not. Unsubscribing
/// clears `active`; subscribing again sets it back.
#[derive(Debug, Clone, Serialize)]
pub struct NewsletterSubscriber {
    pub id: SubscriberId,
    pub email: Email,
    pub subscribed_at: DateTime<Utc>,
    pub active: bool,
}
