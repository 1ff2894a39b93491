//! Integration tests for admin authentication and the admin data API.

use axum::http::{StatusCode, header};

use awalan_integration_tests::{ADMIN_PASSWORD, TestApp};

const BUDI: &str = "name=Budi&phone=081234567890&service=logo-only&message=Butuh+logo";
const SARI: &str = "name=Sari&phone=085712345678&service=brosur&message=Flyer+promo";

// =============================================================================
// Access Control
// =============================================================================

#[tokio::test]
async fn test_unauthenticated_api_is_unauthorized_then_lists_after_login() {
    let app = TestApp::new();
    app.create_admin().await;
    app.post_form("/api/contact", BUDI, None).await;
    app.post_form("/api/contact", SARI, None).await;

    let denied = app.get("/api/admin/contacts", None).await;
    assert_eq!(denied.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        denied.json(),
        serde_json::json!({"success": false, "message": "Unauthorized"})
    );

    let cookie = app.login().await;
    let listed = app.get("/api/admin/contacts", Some(&cookie)).await;

    assert_eq!(listed.status, StatusCode::OK);
    let json = listed.json();
    assert_eq!(json["success"], true);
    let names: Vec<_> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap().to_owned())
        .collect();
    assert_eq!(names, vec!["Sari", "Budi"]);
}

#[tokio::test]
async fn test_subscriber_list_requires_login() {
    let app = TestApp::new();
    app.create_admin().await;
    app.post_form("/api/newsletter", "email=sari%40example.com", None)
        .await;

    let denied = app.get("/api/admin/subscribers", None).await;
    assert_eq!(denied.status, StatusCode::UNAUTHORIZED);

    let cookie = app.login().await;
    let listed = app.get("/api/admin/subscribers?limit=1", Some(&cookie)).await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.json()["data"][0]["email"], "sari@example.com");
}

#[tokio::test]
async fn test_dashboard_redirects_to_login() {
    let app = TestApp::new();

    let response = app.get("/admin", None).await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.header(header::LOCATION), Some("/admin/login"));
}

// =============================================================================
// Login / Logout
// =============================================================================

#[tokio::test]
async fn test_wrong_password_rerenders_without_echo() {
    let app = TestApp::new();
    app.create_admin().await;

    let response = app
        .post_form(
            "/admin/login",
            "username=admin&password=guess-me-if-you-can",
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    let page = response.text();
    assert!(page.contains("Invalid username or password"));
    assert!(!page.contains("guess-me-if-you-can"));
    assert!(response.session_cookie().is_none());
}

#[tokio::test]
async fn test_unknown_user_gets_same_error() {
    let app = TestApp::new();
    app.create_admin().await;

    let body = format!("username=nobody&password={ADMIN_PASSWORD}");
    let response = app.post_form("/admin/login", &body, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(response.text().contains("Invalid username or password"));
}

#[tokio::test]
async fn test_dashboard_after_login() {
    let app = TestApp::new();
    app.create_admin().await;
    app.post_form("/api/contact", BUDI, None).await;
    let cookie = app.login().await;

    let response = app.get("/admin", Some(&cookie)).await;

    assert_eq!(response.status, StatusCode::OK);
    let page = response.text();
    assert!(page.contains("Budi"));
    assert!(page.contains("Logo Only"));
    assert!(page.contains("https://wa.me/6281234567890"));

    // Logged-in admins skip the login form
    let login_page = app.get("/admin/login", Some(&cookie)).await;
    assert_eq!(login_page.status, StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_logout_invalidates_session() {
    let app = TestApp::new();
    app.create_admin().await;
    let cookie = app.login().await;
    assert_eq!(
        app.get("/api/admin/contacts", Some(&cookie)).await.status,
        StatusCode::OK
    );

    let logout = app.post_form("/admin/logout", "", Some(&cookie)).await;
    assert_eq!(logout.status, StatusCode::SEE_OTHER);
    assert_eq!(logout.header(header::LOCATION), Some("/admin/login"));

    let after = app.get("/api/admin/contacts", Some(&cookie)).await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Status Updates
// =============================================================================

#[tokio::test]
async fn test_update_contact_status() {
    let app = TestApp::new();
    app.create_admin().await;
    app.post_form("/api/contact", BUDI, None).await;
    let cookie = app.login().await;
    let id = app.get("/api/admin/contacts", Some(&cookie)).await.json()["data"][0]["id"]
        .as_i64()
        .unwrap();

    let uri = format!("/api/admin/contacts/{id}/status");
    let updated = app
        .post_json(&uri, &serde_json::json!({"status": "replied"}), Some(&cookie))
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.json()["data"]["status"], "replied");

    let bad = app
        .post_json(&uri, &serde_json::json!({"status": "deleted"}), Some(&cookie))
        .await;
    assert_eq!(bad.status, StatusCode::BAD_REQUEST);

    let missing = app
        .post_json(
            "/api/admin/contacts/9999/status",
            &serde_json::json!({"status": "read"}),
            Some(&cookie),
        )
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    let anonymous = app
        .post_json(&uri, &serde_json::json!({"status": "read"}), None)
        .await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_admin_requests_get_envelope() {
    let app = TestApp::new();
    app.create_admin().await;
    let cookie = app.login().await;

    let bad_limit = app.get("/api/admin/contacts?limit=abc", Some(&cookie)).await;
    assert_eq!(bad_limit.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_limit.json()["success"], false);

    let bad_id = app
        .post_json(
            "/api/admin/contacts/abc/status",
            &serde_json::json!({"status": "read"}),
            Some(&cookie),
        )
        .await;
    assert_eq!(bad_id.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_id.json()["success"], false);

    let missing_status = app
        .post_json(
            "/api/admin/contacts/1/status",
            &serde_json::json!({}),
            Some(&cookie),
        )
        .await;
    assert_eq!(missing_status.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing_status.json()["success"], false);
}
