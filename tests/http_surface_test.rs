//! Transport behaviour shared by all three apps: unmatched routes, the
//! auth header contract, and the middleware headers.

mod common;

use axum::http::{HeaderValue, Method, StatusCode, header};
use serde_json::{Value, json};

use common::{bearer, register, server, server_with_secret};

#[tokio::test]
async fn unmatched_route_is_a_json_404() {
    for kind in ["blog", "shop", "travel"] {
        let server = server(kind);

        let res = server.get("/api/nope").await;
        res.assert_status_not_found();
        res.assert_json(&json!({ "error": "Route not found" }));
        assert_eq!(
            res.header(header::CONTENT_TYPE),
            HeaderValue::from_static("application/json; charset=utf-8")
        );
    }
}

#[tokio::test]
async fn wrong_method_on_known_path_is_route_not_found() {
    let server = server("blog");

    let res = server.method(Method::PATCH, "/api/posts").await;
    res.assert_status_not_found();
    res.assert_json(&json!({ "error": "Route not found" }));
}

#[tokio::test]
async fn non_numeric_id_never_reaches_the_handler() {
    let server = server("blog");

    let res = server.get("/api/posts/abc").await;
    res.assert_json(&json!({ "error": "Route not found" }));
}

#[tokio::test]
async fn health_reports_ok() {
    let server = server("travel");

    let res = server.get("/api/health").await;
    res.assert_status_ok();
    let body: Value = res.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "connected");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn missing_and_malformed_tokens_are_401() {
    let server = server("blog");

    let res = server.get("/api/auth/profile").await;
    res.assert_status_unauthorized();
    res.assert_json(&json!({ "error": "Authorization token required" }));

    let res = server
        .get("/api/auth/profile")
        .add_header(header::AUTHORIZATION, "Token abc")
        .await;
    res.assert_status_unauthorized();

    let res = server
        .get("/api/auth/profile")
        .add_header(header::AUTHORIZATION, bearer("not.a.jwt"))
        .await;
    res.assert_status_unauthorized();
    res.assert_json(&json!({ "error": "Invalid or expired token" }));
}

#[tokio::test]
async fn token_from_another_secret_is_rejected() {
    let ours = server("blog");
    let theirs = server_with_secret("blog", "some-other-secret");

    let foreign = register(&theirs, "mallory").await;
    register(&ours, "mallory").await;

    let res = ours
        .get("/api/auth/profile")
        .add_header(header::AUTHORIZATION, bearer(&foreign.token))
        .await;
    res.assert_status_unauthorized();
}

#[tokio::test]
async fn profile_accepts_own_token() {
    let server = server("shop");
    let alice = register(&server, "alice").await;

    let res = server
        .get("/api/auth/profile")
        .add_header(header::AUTHORIZATION, bearer(&alice.token))
        .await;
    res.assert_status_ok();
    let body: Value = res.json();
    assert_eq!(body["user"]["id"], alice.id);
    assert_eq!(body["user"]["role"], "user");
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn responses_carry_request_id_and_security_headers() {
    let server = server("blog");

    let res = server.get("/api/health").await;
    assert!(!res.header("x-request-id").is_empty());
    assert_eq!(res.header("x-content-type-options"), "nosniff");
    assert_eq!(res.header("x-frame-options"), "DENY");

    let res = server
        .get("/api/health")
        .add_header("x-request-id", "req-42")
        .await;
    assert_eq!(res.header("x-request-id"), "req-42");
}

#[tokio::test]
async fn preflight_is_answered_by_cors() {
    let server = server("travel");

    let res = server
        .method(Method::OPTIONS, "/api/travels")
        .add_header(header::ORIGIN, "http://localhost:3000")
        .add_header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .await;
    res.assert_status(StatusCode::OK);
    assert_eq!(res.header(header::ACCESS_CONTROL_ALLOW_ORIGIN), "*");
}

#[tokio::test]
async fn preflight_allows_patch() {
    let server = server("blog");

    let res = server
        .method(Method::OPTIONS, "/api/users/1")
        .add_header(header::ORIGIN, "http://localhost:3000")
        .add_header(header::ACCESS_CONTROL_REQUEST_METHOD, "PATCH")
        .await;
    res.assert_status(StatusCode::OK);
    let allowed = res.header(header::ACCESS_CONTROL_ALLOW_METHODS);
    let allowed = allowed.to_str().unwrap();
    assert!(allowed.split(',').any(|m| m.trim() == "PATCH"), "{allowed}");
}
