//! Contact and newsletter intake pipeline.
//!
//! Both flows run the same stages:
//!
//! ```text
//! received -> validated -> persisted -> notified -> done
//!                 |            |
//!                 v            v
//!             rejected    storage error
//! ```
//!
//! Validation finishes before anything is stored and storage finishes
//! before any notification is attempted. Notification failures are logged
//! and do not change the outcome; the record is already durable.

use thiserror::Error;
use tracing::{Span, instrument};

use awalan_core::{ContactId, Email, SubscriberId};

use crate::db::{ContactRepository, RepositoryError, SubscriberRepository};
use crate::models::NewContactSubmission;
use crate::services::email::Notifier;
use crate::services::validation::{
    ContactForm, ValidationErrors, validate_contact, validate_newsletter,
};

/// Where a request is in the intake pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntakeStage {
    Received,
    Validated,
    Persisted,
    Notified,
    Done,
    Rejected,
}

impl IntakeStage {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Validated => "validated",
            Self::Persisted => "persisted",
            Self::Notified => "notified",
            Self::Done => "done",
            Self::Rejected => "rejected",
        }
    }
}

/// Errors that end an intake request.
#[derive(Debug, Error)]
pub enum IntakeError {
    /// One or more fields failed validation; nothing was stored.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// The newsletter email is already an active subscriber.
    #[error("email is already subscribed")]
    AlreadySubscribed,

    /// The backend failed; nothing is retried.
    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}

/// A stored contact submission, as returned to the submitter.
#[derive(Debug, Clone)]
pub struct ContactReceipt {
    pub id: ContactId,
    pub contact: NewContactSubmission,
}

/// Runs submissions through validation, storage and notification.
pub struct IntakeService<'a> {
    contacts: &'a dyn ContactRepository,
    subscribers: &'a dyn SubscriberRepository,
    notifier: &'a dyn Notifier,
}

impl<'a> IntakeService<'a> {
    /// Create an intake service over the given backends.
    #[must_use]
    pub const fn new(
        contacts: &'a dyn ContactRepository,
        subscribers: &'a dyn SubscriberRepository,
        notifier: &'a dyn Notifier,
    ) -> Self {
        Self {
            contacts,
            subscribers,
            notifier,
        }
    }

    /// Handle a contact form submission.
    ///
    /// Notifies the admin, and the submitter too when they left an email.
    ///
    /// # Errors
    ///
    /// Returns `IntakeError::Validation` with every failing field, or
    /// `IntakeError::Storage` if the submission could not be stored.
    #[instrument(skip_all, fields(stage = tracing::field::Empty, contact_id = tracing::field::Empty))]
    pub async fn submit_contact(&self, form: &ContactForm) -> Result<ContactReceipt, IntakeError> {
        advance(IntakeStage::Received);

        let contact = validate_contact(form).inspect_err(|errors| {
            advance(IntakeStage::Rejected);
            tracing::info!(errors = %errors, "Contact submission rejected");
        })?;
        advance(IntakeStage::Validated);

        let id = self.contacts.save(&contact).await?;
        Span::current().record("contact_id", id.as_i32());
        advance(IntakeStage::Persisted);

        if let Err(e) = self.notifier.notify_admin(id, &contact).await {
            tracing::warn!(error = %e, "Admin notification failed");
        }
        if let Some(email) = &contact.email
            && let Err(e) = self.notifier.confirm_to_user(email, &contact.name).await
        {
            tracing::warn!(error = %e, "Submitter confirmation failed");
        }
        advance(IntakeStage::Notified);

        tracing::info!(service = %contact.service, "Contact submission stored");
        advance(IntakeStage::Done);

        Ok(ContactReceipt { id, contact })
    }

    /// Handle a newsletter signup.
    ///
    /// # Errors
    ///
    /// Returns `IntakeError::Validation` for a bad address,
    /// `IntakeError::AlreadySubscribed` if it is already active, or
    /// `IntakeError::Storage` if the backend failed.
    #[instrument(skip_all, fields(stage = tracing::field::Empty))]
    pub async fn subscribe_newsletter(&self, email: &str) -> Result<SubscriberId, IntakeError> {
        advance(IntakeStage::Received);

        let email: Email = validate_newsletter(email).inspect_err(|_| {
            advance(IntakeStage::Rejected);
        })?;
        advance(IntakeStage::Validated);

        let id = self.subscribers.subscribe(&email).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => {
                advance(IntakeStage::Rejected);
                IntakeError::AlreadySubscribed
            }
            other => IntakeError::Storage(other),
        })?;
        advance(IntakeStage::Persisted);

        if let Err(e) = self.notifier.welcome_subscriber(&email).await {
            tracing::warn!(error = %e, "Welcome email failed");
        }
        advance(IntakeStage::Notified);

        tracing::info!(email = %email, subscriber_id = %id, "Newsletter subscription stored");
        advance(IntakeStage::Done);

        Ok(id)
    }
}

/// Record the current stage on the request span.
fn advance(stage: IntakeStage) {
    Span::current().record("stage", stage.as_str());
    tracing::debug!(stage = stage.as_str(), "Intake stage");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use awalan_core::ContactStatus;

    use super::*;
    use crate::db::InMemoryStore;
    use crate::models::{ContactSubmission, NewsletterSubscriber};
    use crate::services::email::NotifyError;

    /// Records calls; optionally fails every one of them.
    #[derive(Default)]
    struct RecordingNotifier {
        calls: Mutex<Vec<String>>,
        fail: bool,
    }

    impl RecordingNotifier {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: String) -> Result<(), NotifyError> {
            self.calls.lock().unwrap().push(call);
            if self.fail {
                Err(NotifyError::InvalidAddress("smtp down".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn notify_admin(
            &self,
            id: ContactId,
            _contact: &NewContactSubmission,
        ) -> Result<(), NotifyError> {
            self.record(format!("admin:{id}"))
        }

        async fn confirm_to_user(&self, email: &Email, _name: &str) -> Result<(), NotifyError> {
            self.record(format!("confirm:{email}"))
        }

        async fn welcome_subscriber(&self, email: &Email) -> Result<(), NotifyError> {
            self.record(format!("welcome:{email}"))
        }
    }

    /// Every storage call fails as if the database were down.
    struct UnavailableStore;

    fn unavailable() -> RepositoryError {
        RepositoryError::Database(sqlx::Error::PoolTimedOut)
    }

    #[async_trait]
    impl ContactRepository for UnavailableStore {
        async fn save(&self, _contact: &NewContactSubmission) -> Result<ContactId, RepositoryError> {
            Err(unavailable())
        }

        async fn list_recent(&self, _limit: i64) -> Result<Vec<ContactSubmission>, RepositoryError> {
            Err(unavailable())
        }

        async fn update_status(
            &self,
            _id: ContactId,
            _status: ContactStatus,
        ) -> Result<ContactSubmission, RepositoryError> {
            Err(unavailable())
        }

        async fn ping(&self) -> Result<(), RepositoryError> {
            Err(unavailable())
        }
    }

    #[async_trait]
    impl SubscriberRepository for UnavailableStore {
        async fn subscribe(&self, _email: &Email) -> Result<SubscriberId, RepositoryError> {
            Err(unavailable())
        }

        async fn list_recent(
            &self,
            _limit: i64,
        ) -> Result<Vec<NewsletterSubscriber>, RepositoryError> {
            Err(unavailable())
        }

        async fn deactivate(&self, _email: &Email) -> Result<bool, RepositoryError> {
            Err(unavailable())
        }
    }

    fn budi() -> ContactForm {
        ContactForm {
            name: "Budi".to_string(),
            email: String::new(),
            phone: "081234567890".to_string(),
            service: "logo-only".to_string(),
            message: "Butuh logo".to_string(),
        }
    }

    #[tokio::test]
    async fn test_contact_without_email_notifies_admin_only() {
        let store = InMemoryStore::new();
        let notifier = RecordingNotifier::default();
        let intake = IntakeService::new(&store, &store, &notifier);

        let receipt = intake.submit_contact(&budi()).await.unwrap();

        assert_eq!(store.contact_count(), 1);
        assert_eq!(notifier.calls(), vec![format!("admin:{}", receipt.id)]);
    }

    #[tokio::test]
    async fn test_contact_with_email_also_confirms() {
        let store = InMemoryStore::new();
        let notifier = RecordingNotifier::default();
        let intake = IntakeService::new(&store, &store, &notifier);
        let form = ContactForm {
            email: "Budi@Example.com".to_string(),
            ..budi()
        };

        let receipt = intake.submit_contact(&form).await.unwrap();

        assert_eq!(
            notifier.calls(),
            vec![
                format!("admin:{}", receipt.id),
                "confirm:budi@example.com".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn test_invalid_contact_stores_and_notifies_nothing() {
        let store = InMemoryStore::new();
        let notifier = RecordingNotifier::default();
        let intake = IntakeService::new(&store, &store, &notifier);
        let form = ContactForm {
            phone: "12345".to_string(),
            ..budi()
        };

        let err = intake.submit_contact(&form).await.unwrap_err();

        assert!(matches!(err, IntakeError::Validation(_)));
        assert_eq!(store.contact_count(), 0);
        assert!(notifier.calls().is_empty());
    }

    #[tokio::test]
    async fn test_notification_failure_keeps_record() {
        let store = InMemoryStore::new();
        let notifier = RecordingNotifier::failing();
        let intake = IntakeService::new(&store, &store, &notifier);
        let form = ContactForm {
            email: "budi@example.com".to_string(),
            ..budi()
        };

        intake.submit_contact(&form).await.unwrap();

        assert_eq!(store.contact_count(), 1);
        assert_eq!(notifier.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_newsletter_twice() {
        let store = InMemoryStore::new();
        let notifier = RecordingNotifier::default();
        let intake = IntakeService::new(&store, &store, &notifier);

        intake.subscribe_newsletter("sari@example.com").await.unwrap();
        let second = intake.subscribe_newsletter(" SARI@example.com ").await;

        assert!(matches!(second, Err(IntakeError::AlreadySubscribed)));
        assert_eq!(store.subscriber_count(), 1);
        assert_eq!(notifier.calls(), vec!["welcome:sari@example.com".to_string()]);
    }

    #[tokio::test]
    async fn test_newsletter_invalid_email() {
        let store = InMemoryStore::new();
        let notifier = RecordingNotifier::default();
        let intake = IntakeService::new(&store, &store, &notifier);

        let err = intake.subscribe_newsletter("not-an-email").await.unwrap_err();

        assert!(matches!(err, IntakeError::Validation(_)));
        assert_eq!(store.subscriber_count(), 0);
        assert!(notifier.calls().is_empty());
    }

    #[tokio::test]
    async fn test_contact_storage_failure_skips_notifications() {
        let notifier = RecordingNotifier::default();
        let intake = IntakeService::new(&UnavailableStore, &UnavailableStore, &notifier);
        let form = ContactForm {
            email: "budi@example.com".to_string(),
            ..budi()
        };

        let err = intake.submit_contact(&form).await.unwrap_err();

        assert!(matches!(
            err,
            IntakeError::Storage(RepositoryError::Database(_))
        ));
        assert!(notifier.calls().is_empty());
    }

    #[tokio::test]
    async fn test_newsletter_storage_failure_skips_welcome() {
        let notifier = RecordingNotifier::default();
        let intake = IntakeService::new(&UnavailableStore, &UnavailableStore, &notifier);

        let err = intake
            .subscribe_newsletter("sari@example.com")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            IntakeError::Storage(RepositoryError::Database(_))
        ));
        assert!(notifier.calls().is_empty());
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(IntakeStage::Received.as_str(), "received");
        assert_eq!(IntakeStage::Rejected.as_str(), "rejected");
    }
}
