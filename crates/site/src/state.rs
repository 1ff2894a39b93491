//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::SiteConfig;
use crate::db::{AdminUserRepository, ContactRepository, Repositories, SubscriberRepository};
use crate::services::{IntakeService, Notifier, UnsubscribeSigner};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Storage and notification sit behind trait
/// objects so tests can swap in the in-memory store and a recording
/// notifier.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: SiteConfig,
    repos: Repositories,
    notifier: Arc<dyn Notifier>,
    signer: UnsubscribeSigner,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(
        config: SiteConfig,
        repos: Repositories,
        notifier: Arc<dyn Notifier>,
        signer: UnsubscribeSigner,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                repos,
                notifier,
                signer,
            }),
        }
    }

    /// Get a reference to the site configuration.
    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn contacts(&self) -> &dyn ContactRepository {
        self.inner.repos.contacts.as_ref()
    }

    #[must_use]
    pub fn subscribers(&self) -> &dyn SubscriberRepository {
        self.inner.repos.subscribers.as_ref()
    }

    #[must_use]
    pub fn admins(&self) -> &dyn AdminUserRepository {
        self.inner.repos.admins.as_ref()
    }

    #[must_use]
    pub fn notifier(&self) -> &dyn Notifier {
        self.inner.notifier.as_ref()
    }

    /// Signer for newsletter unsubscribe links.
    #[must_use]
    pub fn signer(&self) -> &UnsubscribeSigner {
        &self.inner.signer
    }

    /// Intake pipeline wired to this state's backends.
    #[must_use]
    pub fn intake(&self) -> IntakeService<'_> {
        IntakeService::new(self.contacts(), self.subscribers(), self.notifier())
    }
}
