//! In-memory backend for all repositories.
//!
//! Every operation takes the one lock for its whole duration, so the
//! subscriber check-then-insert cannot race.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;

use awalan_core::{AdminUserId, ContactId, ContactStatus, Email, SubscriberId};

use super::{
    AdminUserRepository, ContactRepository, RepositoryError, SubscriberRepository, clamp_limit,
};
use crate::models::{AdminUser, ContactSubmission, NewContactSubmission, NewsletterSubscriber};

#[derive(Default)]
struct Tables {
    contacts: Vec<ContactSubmission>,
    subscribers: Vec<NewsletterSubscriber>,
    admins: Vec<(AdminUser, String)>,
    next_id: i32,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

/// Shared in-memory tables. Clones share the same data.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of stored contact submissions.
    #[must_use]
    pub fn contact_count(&self) -> usize {
        self.lock().contacts.len()
    }

    /// Number of stored subscriber rows, active or not.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }
}

#[async_trait]
impl ContactRepository for InMemoryStore {
    async fn save(&self, contact: &NewContactSubmission) -> Result<ContactId, RepositoryError> {
        let mut tables = self.lock();
        let id = ContactId::new(tables.next_id());
        let now = Utc::now();
        tables.contacts.push(ContactSubmission {
            id,
            name: contact.name.clone(),
            email: contact.email.clone(),
            phone: contact.phone.clone(),
            service: contact.service,
            message: contact.message.clone(),
            status: ContactStatus::New,
            created_at: now,
            updated_at: now,
        });
        Ok(id)
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<ContactSubmission>, RepositoryError> {
        let tables = self.lock();
        let mut contacts = tables.contacts.clone();
        contacts.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        contacts.truncate(usize::try_from(clamp_limit(limit)).unwrap_or(usize::MAX));
        Ok(contacts)
    }

    async fn update_status(
        &self,
        id: ContactId,
        status: ContactStatus,
    ) -> Result<ContactSubmission, RepositoryError> {
        let mut tables = self.lock();
        let contact = tables
            .contacts
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(RepositoryError::NotFound)?;
        contact.status = status;
        contact.updated_at = Utc::now();
        Ok(contact.clone())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[async_trait]
impl SubscriberRepository for InMemoryStore {
    async fn subscribe(&self, email: &Email) -> Result<SubscriberId, RepositoryError> {
        let mut tables = self.lock();

        if let Some(existing) = tables.subscribers.iter_mut().find(|s| &s.email == email) {
            if existing.active {
                return Err(RepositoryError::Conflict(
                    "subscriber already exists".to_owned(),
                ));
            }
            existing.active = true;
            existing.subscribed_at = Utc::now();
            return Ok(existing.id);
        }

        let id = SubscriberId::new(tables.next_id());
        tables.subscribers.push(NewsletterSubscriber {
            id,
            email: email.clone(),
            subscribed_at: Utc::now(),
            active: true,
        });
        Ok(id)
    }

    async fn list_recent(
        &self,
        limit: i64,
    ) -> Result<Vec<NewsletterSubscriber>, RepositoryError> {
        let tables = self.lock();
        let mut subscribers = tables.subscribers.clone();
        subscribers.sort_by(|a, b| (b.subscribed_at, b.id).cmp(&(a.subscribed_at, a.id)));
        subscribers.truncate(usize::try_from(clamp_limit(limit)).unwrap_or(usize::MAX));
        Ok(subscribers)
    }

    async fn deactivate(&self, email: &Email) -> Result<bool, RepositoryError> {
        let mut tables = self.lock();
        let Some(subscriber) = tables
            .subscribers
            .iter_mut()
            .find(|s| &s.email == email && s.active)
        else {
            return Ok(false);
        };
        subscriber.active = false;
        Ok(true)
    }
}

#[async_trait]
impl AdminUserRepository for InMemoryStore {
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<(AdminUser, String)>, RepositoryError> {
        Ok(self
            .lock()
            .admins
            .iter()
            .find(|(admin, _)| admin.username == username)
            .cloned())
    }

    async fn create(
        &self,
        username: &str,
        password_hash: &str,
        email: Option<&Email>,
    ) -> Result<AdminUser, RepositoryError> {
        let mut tables = self.lock();
        if tables.admins.iter().any(|(a, _)| a.username == username) {
            return Err(RepositoryError::Conflict(
                "admin user already exists".to_owned(),
            ));
        }

        let admin = AdminUser {
            id: AdminUserId::new(tables.next_id()),
            username: username.to_owned(),
            email: email.cloned(),
            last_login: None,
            created_at: Utc::now(),
        };
        tables.admins.push((admin.clone(), password_hash.to_owned()));
        Ok(admin)
    }

    async fn record_login(&self, id: AdminUserId) -> Result<(), RepositoryError> {
        let mut tables = self.lock();
        let (admin, _) = tables
            .admins
            .iter_mut()
            .find(|(a, _)| a.id == id)
            .ok_or(RepositoryError::NotFound)?;
        admin.last_login = Some(Utc::now());
        Ok(())
    }
}
