//! Integration test harness for the Awalan Design site.
//!
//! Builds the real router with the in-memory store, an in-memory session
//! store and a recording notifier, then drives it with `tower::ServiceExt`.
//! No database or SMTP server is needed.
//!
//! ```rust,ignore
//! let app = TestApp::new();
//! let response = app.post_form("/api/newsletter", "email=sari@example.com", None).await;
//! assert_eq!(response.status, StatusCode::OK);
//! ```

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Request, StatusCode, header},
};
use secrecy::SecretString;
use tower::ServiceExt;
use tower_sessions::MemoryStore;

use awalan_core::{ContactId, ContactStatus, Email, SubscriberId};
use awalan_site::app::build_router;
use awalan_site::config::{DEFAULT_WHATSAPP, SiteConfig};
use awalan_site::db::{
    AdminUserRepository, ContactRepository, InMemoryStore, Repositories, RepositoryError,
    SubscriberRepository,
};
use awalan_site::middleware::{SESSION_COOKIE_NAME, create_session_layer};
use awalan_site::models::{ContactSubmission, NewContactSubmission, NewsletterSubscriber};
use awalan_site::services::auth::hash_password;
use awalan_site::services::{Notifier, NotifyError, UnsubscribeSigner};
use awalan_site::state::AppState;

pub const BASE_URL: &str = "http://localhost:8080";
pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "correct-horse-battery";

const SIGNING_SECRET: &str = "k3Jx9!pQ2@vL7#mN4$rT8^wZ1&bC6*hY";

/// Records every notification; fails all of them when `fail` is set.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    calls: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingNotifier {
    /// Calls so far, e.g. `admin:1`, `confirm:budi@example.com`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) -> Result<(), NotifyError> {
        self.calls.lock().unwrap().push(call);
        if self.fail {
            Err(NotifyError::InvalidAddress("smtp unavailable".to_string()))
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

/// Contact and subscriber storage that is always down.
#[derive(Debug, Default)]
pub struct UnavailableStore;

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

/// A buffered response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn header(&self, name: header::HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// `name=value` of the session cookie set by this response, if any.
    pub fn session_cookie(&self) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(|v| v.split(';').next())
            .find(|pair| pair.starts_with(&format!("{SESSION_COOKIE_NAME}=")))
            .map(str::to_owned)
    }
}

/// The site wired to in-memory backends.
pub struct TestApp {
    pub router: Router,
    pub store: InMemoryStore,
    pub notifier: Arc<RecordingNotifier>,
    pub signer: UnsubscribeSigner,
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TestApp {
    pub fn new() -> Self {
        Self::build(RecordingNotifier::default())
    }

    /// Every notification attempt fails.
    pub fn with_failing_notifier() -> Self {
        Self::build(RecordingNotifier {
            fail: true,
            ..RecordingNotifier::default()
        })
    }

    /// Contact and subscriber storage fail; admin logins still work.
    pub fn with_unavailable_storage() -> Self {
        Self::build_with(RecordingNotifier::default(), |store| Repositories {
            contacts: Arc::new(UnavailableStore),
            subscribers: Arc::new(UnavailableStore),
            ..Repositories::in_memory(store)
        })
    }

    fn build(notifier: RecordingNotifier) -> Self {
        Self::build_with(notifier, Repositories::in_memory)
    }

    fn build_with(
        notifier: RecordingNotifier,
        repos: impl FnOnce(&InMemoryStore) -> Repositories,
    ) -> Self {
        let store = InMemoryStore::new();
        let notifier = Arc::new(notifier);
        let signer = UnsubscribeSigner::new(&SecretString::from(SIGNING_SECRET)).unwrap();

        let state = AppState::new(test_config(), repos(&store), notifier.clone(), signer.clone());
        let router = build_router(state, create_session_layer(MemoryStore::default(), false));

        Self {
            router,
            store,
            notifier,
            signer,
        }
    }

    /// Create the default admin account.
    pub async fn create_admin(&self) {
        let hash = hash_password(ADMIN_PASSWORD).unwrap();
        self.store
            .create(ADMIN_USERNAME, &hash, None)
            .await
            .unwrap();
    }

    /// Log in as the default admin and return the session cookie.
    pub async fn login(&self) -> String {
        let body = format!("username={ADMIN_USERNAME}&password={ADMIN_PASSWORD}");
        let response = self.post_form("/admin/login", &body, None).await;
        assert_eq!(response.status, StatusCode::SEE_OTHER, "{}", response.text());
        response.session_cookie().unwrap()
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        let mut builder = Request::get(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn post_form(&self, uri: &str, body: &str, cookie: Option<&str>) -> TestResponse {
        let mut builder = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(body.to_owned())).unwrap())
            .await
    }

    pub async fn post_json(
        &self,
        uri: &str,
        body: &serde_json::Value,
        cookie: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::post(uri).header(header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec();
        TestResponse {
            status,
            headers,
            body,
        }
    }
}

fn test_config() -> SiteConfig {
    SiteConfig {
        database_url: SecretString::from("postgres://unused"),
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 8080,
        base_url: BASE_URL.to_string(),
        signing_secret: SecretString::from(SIGNING_SECRET),
        static_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../site/static")),
        contact_list_limit: 50,
        subscriber_list_limit: 100,
        email: None,
        whatsapp_number: DEFAULT_WHATSAPP.to_string(),
        sentry_dsn: None,
        sentry_environment: None,
        json_logs: false,
    }
}
