//! Shared helpers for the HTTP-level tests.
#![allow(dead_code)]

use axum_test::TestServer;
use serde_json::{Value, json};

use trirest::api;
use trirest::app::{build_app, build_state};
use trirest::config::Config;

pub const SECRET: &str = "integration-test-secret";

pub fn config(kind: &str, secret: &str) -> Config {
    Config::from_lookup(|key| match key {
        "APP_KIND" => Some(kind.to_string()),
        "JWT_SECRET" => Some(secret.to_string()),
        _ => None,
    })
    .expect("test config")
}

/// A fresh app with an empty store.
pub fn server(kind: &str) -> TestServer {
    server_with_secret(kind, SECRET)
}

pub fn server_with_secret(kind: &str, secret: &str) -> TestServer {
    let config = config(kind, secret);
    let state = build_state(&config).expect("state");
    let routes = api::routes(config.app_kind).expect("routes");

    TestServer::new(build_app(state, routes, &config)).expect("test server")
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

pub struct Account {
    pub id: i64,
    pub token: String,
}

pub async fn register_with(server: &TestServer, body: Value) -> Account {
    let res = server.post("/api/auth/register").json(&body).await;
    res.assert_status(axum::http::StatusCode::CREATED);

    let body: Value = res.json();
    Account {
        id: body["user"]["id"].as_i64().expect("user id"),
        token: body["token"].as_str().expect("token").to_string(),
    }
}

pub async fn register(server: &TestServer, name: &str) -> Account {
    register_with(
        server,
        json!({
            "name": name,
            "email": format!("{name}@example.com"),
            "password": "password123",
        }),
    )
    .await
}
