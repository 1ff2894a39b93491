//! Integration tests for contact form intake.

use axum::http::{StatusCode, header};

use awalan_core::ContactStatus;
use awalan_integration_tests::TestApp;
use awalan_site::db::ContactRepository;
use awalan_site::error::GENERIC_FAILURE;

const BUDI: &str = "name=Budi&phone=081234567890&service=logo-only&message=Butuh+logo";

// =============================================================================
// Successful Submissions
// =============================================================================

#[tokio::test]
async fn test_contact_without_email_stored_and_admin_notified() {
    let app = TestApp::new();

    let response = app.post_form("/api/contact", BUDI, None).await;

    assert_eq!(response.status, StatusCode::OK);
    let json = response.json();
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Message sent! We will contact you soon.");
    assert_eq!(
        json["data"],
        serde_json::json!({"name": "Budi", "phone": "081234567890", "service": "logo-only"})
    );

    let stored = app.store.list_recent(10).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].name, "Budi");
    assert_eq!(stored[0].status, ContactStatus::New);
    assert!(stored[0].email.is_none());

    // No email given, so no confirmation
    assert_eq!(app.notifier.calls(), vec![format!("admin:{}", stored[0].id)]);
}

#[tokio::test]
async fn test_contact_with_email_sends_confirmation() {
    let app = TestApp::new();
    let body = format!("{BUDI}&email=Budi%40Example.com");

    let response = app.post_form("/api/contact", &body, None).await;

    assert_eq!(response.status, StatusCode::OK);
    let calls = app.notifier.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1], "confirm:budi@example.com");
}

#[tokio::test]
async fn test_notification_failure_still_succeeds() {
    let app = TestApp::with_failing_notifier();
    let body = format!("{BUDI}&email=budi%40example.com");

    let response = app.post_form("/api/contact", &body, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["success"], true);
    assert_eq!(app.store.contact_count(), 1);
    assert_eq!(app.notifier.calls().len(), 2);
}

// =============================================================================
// Validation Failures
// =============================================================================

#[tokio::test]
async fn test_empty_submission_lists_every_missing_field() {
    let app = TestApp::new();

    let response = app.post_form("/api/contact", "", None).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json(),
        serde_json::json!({
            "success": false,
            "message": "Name is required, Phone/WhatsApp number is required, \
                        Service must be selected, Message is required"
        })
    );
    assert_eq!(app.store.contact_count(), 0);
    assert!(app.notifier.calls().is_empty());
}

#[tokio::test]
async fn test_invalid_phone_rejected() {
    let app = TestApp::new();
    let body = "name=Budi&phone=12345&service=logo-only&message=Halo";

    let response = app.post_form("/api/contact", body, None).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["message"], "Phone/WhatsApp number is invalid");
    assert_eq!(app.store.contact_count(), 0);
}

#[tokio::test]
async fn test_invalid_optional_email_rejected() {
    let app = TestApp::new();
    let body = format!("{BUDI}&email=not-an-email");

    let response = app.post_form("/api/contact", &body, None).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["message"], "Email format is invalid");
}

#[tokio::test]
async fn test_submitted_markup_is_stored_verbatim() {
    let app = TestApp::new();
    let body = "name=%3Cb%3EBudi%3C%2Fb%3E&phone=081234567890&service=lainnya&message=%3Cscript%3E";

    let response = app.post_form("/api/contact", body, None).await;

    assert_eq!(response.status, StatusCode::OK);
    let stored = app.store.list_recent(1).await.unwrap();
    assert_eq!(stored[0].name, "<b>Budi</b>");
    assert_eq!(stored[0].message, "<script>");
}

// =============================================================================
// Surrounding Stack
// =============================================================================

#[tokio::test]
async fn test_api_responses_carry_security_headers() {
    let app = TestApp::new();

    let response = app.post_form("/api/contact", BUDI, None).await;

    assert_eq!(response.header(header::X_FRAME_OPTIONS), Some("DENY"));
    assert_eq!(
        response.header(header::CACHE_CONTROL),
        Some("no-store, max-age=0")
    );
    assert!(response.header(header::HeaderName::from_static("x-request-id")).is_some());
}

#[tokio::test]
async fn test_health_and_static_fallback() {
    let app = TestApp::new();

    let health = app.get("/health", None).await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.text(), "ok");

    let ready = app.get("/health/ready", None).await;
    assert_eq!(ready.status, StatusCode::OK);

    let index = app.get("/", None).await;
    assert_eq!(index.status, StatusCode::OK);
    assert!(index.text().contains("contact-form"));
}

#[tokio::test]
async fn test_wrong_content_type_gets_envelope() {
    let app = TestApp::new();

    let response = app
        .post_json("/api/contact", &serde_json::json!({"name": "Budi"}), None)
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["success"], false);
    assert_eq!(app.store.contact_count(), 0);
}

// =============================================================================
// Storage Failures
// =============================================================================

#[tokio::test]
async fn test_storage_failure_is_generic_500_without_notification() {
    let app = TestApp::with_unavailable_storage();

    let response = app
        .post_form("/api/contact", &format!("{BUDI}&email=budi@example.com"), None)
        .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json(),
        serde_json::json!({"success": false, "message": GENERIC_FAILURE})
    );
    assert!(app.notifier.calls().is_empty());
}

#[tokio::test]
async fn test_readiness_reports_unavailable_storage() {
    let app = TestApp::with_unavailable_storage();

    let response = app.get("/health/ready", None).await;

    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
}
