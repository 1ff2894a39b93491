//! Extractors for the JSON API.
//!
//! Same as axum's `Form`, `Json`, `Query` and `Path`, except that a request
//! they cannot parse is answered with the `{success:false,message}` envelope
//! instead of a plain-text rejection.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Form), rejection(AppError))]
pub struct ApiForm<T>(pub T);

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
        routing::{get, post},
    };
    use serde::Deserialize;
    use tower::ServiceExt;

    use super::*;

    #[derive(Deserialize)]
    struct Limit {
        limit: Option<i64>,
    }

    #[derive(Deserialize)]
    struct Named {
        name: String,
    }

    async fn limit(ApiQuery(query): ApiQuery<Limit>) -> String {
        query.limit.unwrap_or_default().to_string()
    }

    async fn form(ApiForm(form): ApiForm<Named>) -> String {
        form.name
    }

    async fn json(ApiJson(body): ApiJson<Named>) -> String {
        body.name
    }

    async fn path(ApiPath(id): ApiPath<i32>) -> String {
        id.to_string()
    }

    fn app() -> Router {
        Router::new()
            .route("/list", get(limit))
            .route("/form", post(form))
            .route("/json", post(json))
            .route("/items/{id}", get(path))
    }

    async fn send(request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_valid_requests_pass_through() {
        let response = app().oneshot(get_request("/list?limit=5")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app()
            .oneshot(
                Request::post("/form")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("name=Sari"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_bad_query_gets_envelope() {
        let (status, json) = send(get_request("/list?limit=abc")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
        assert!(!json["message"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_form_with_wrong_content_type_gets_envelope() {
        let (status, json) = send(
            Request::post("/form")
                .header(header::CONTENT_TYPE, "text/plain")
                .body(Body::from("name=Sari"))
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    async fn test_malformed_json_gets_envelope() {
        let (status, json) = send(
            Request::post("/json")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{\"name\":"))
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    async fn test_bad_path_segment_gets_envelope() {
        let (status, json) = send(get_request("/items/abc")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
    }
}
