//! Domain models for the site.

pub mod admin;
pub mod contact;
pub mod session;
pub mod subscriber;

pub use admin::AdminUser;
pub use contact::{ContactSubmission, NewContactSubmission};
pub use session::{CurrentAdmin, keys as session_keys};
pub use subscriber::NewsletterSubscriber;
