//! Blog endpoints end to end: post visibility, share links, ownership and
//! subscriptions.

mod common;

use axum::http::{StatusCode, header};
use axum_test::TestServer;
use serde_json::{Value, json};

use common::{Account, bearer, register, server};

async fn create_post(server: &TestServer, author: &Account, restricted: bool) -> Value {
    let res = server
        .post("/api/posts")
        .add_header(header::AUTHORIZATION, bearer(&author.token))
        .json(&json!({
            "title": "Hello",
            "content": "First post",
            "restricted": restricted,
            "tags": ["rust", "web"],
        }))
        .await;
    res.assert_status(StatusCode::CREATED);
    res.json::<Value>()["post"].clone()
}

#[tokio::test]
async fn restricted_post_is_hidden_from_everyone_but_its_author() {
    let server = server("blog");
    let alice = register(&server, "alice").await;
    let post = create_post(&server, &alice, true).await;
    let path = format!("/api/posts/{}", post["id"]);

    let res = server.get(&path).await;
    res.assert_status_not_found();
    res.assert_json(&json!({ "error": "Пост не найден" }));

    let bob = register(&server, "bob").await;
    let res = server
        .get(&path)
        .add_header(header::AUTHORIZATION, bearer(&bob.token))
        .await;
    res.assert_status_not_found();
    res.assert_json(&json!({ "error": "Пост не найден" }));

    let res = server
        .get(&path)
        .add_header(header::AUTHORIZATION, bearer(&alice.token))
        .await;
    res.assert_status_ok();
    assert_eq!(res.json::<Value>()["share_token"], post["share_token"]);
}

#[tokio::test]
async fn owner_sees_the_share_token_and_the_link_works_without_auth() {
    let server = server("blog");
    let alice = register(&server, "alice").await;
    let post = create_post(&server, &alice, true).await;

    let token = post["share_token"].as_str().expect("restricted post has a share token");
    assert_eq!(token.len(), 32);
    assert!(token.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));

    let res = server.get(&format!("/api/share/{token}")).await;
    res.assert_status_ok();
    assert_eq!(res.json::<Value>()["id"], post["id"]);

    let res = server.get("/api/share/00000000000000000000000000000000").await;
    res.assert_status_not_found();
}

#[tokio::test]
async fn public_listing_filters_restricted_posts_for_anonymous_callers() {
    let server = server("blog");
    let alice = register(&server, "alice").await;
    create_post(&server, &alice, false).await;
    create_post(&server, &alice, true).await;

    let anonymous: Vec<Value> = server.get("/api/posts").await.json();
    assert_eq!(anonymous.len(), 1);

    let signed_in: Vec<Value> = server
        .get("/api/posts")
        .add_header(header::AUTHORIZATION, bearer(&alice.token))
        .await
        .json();
    assert_eq!(signed_in.len(), 2);
    assert!(signed_in.iter().all(|p| p["share_token"].is_null()));
}

#[tokio::test]
async fn only_the_author_may_delete_a_post() {
    let server = server("blog");
    let alice = register(&server, "alice").await;
    let bob = register(&server, "bob").await;
    let post = create_post(&server, &alice, false).await;
    let path = format!("/api/posts/{}", post["id"]);

    let res = server
        .delete(&path)
        .add_header(header::AUTHORIZATION, bearer(&bob.token))
        .await;
    res.assert_status_forbidden();

    server.get(&path).await.assert_status_ok();

    let res = server
        .delete(&path)
        .add_header(header::AUTHORIZATION, bearer(&alice.token))
        .await;
    res.assert_status_ok();
    server.get(&path).await.assert_status_not_found();
}

#[tokio::test]
async fn self_subscription_is_rejected_without_side_effects() {
    let server = server("blog");
    let alice = register(&server, "alice").await;
    let path = format!("/api/users/{}", alice.id);

    let res = server
        .post(&format!("{path}/subscribe"))
        .add_header(header::AUTHORIZATION, bearer(&alice.token))
        .await;
    res.assert_status_bad_request();
    res.assert_json(&json!({ "error": "Нельзя подписаться на самого себя" }));

    let profile: Value = server
        .get(&path)
        .add_header(header::AUTHORIZATION, bearer(&alice.token))
        .await
        .json();
    assert_eq!(profile["subscriber_count"], 0);
    assert_eq!(profile["subscription_count"], 0);
}

#[tokio::test]
async fn subscribing_twice_conflicts() {
    let server = server("blog");
    let alice = register(&server, "alice").await;
    let bob = register(&server, "bob").await;
    let path = format!("/api/users/{}/subscribe", bob.id);

    server
        .post(&path)
        .add_header(header::AUTHORIZATION, bearer(&alice.token))
        .await
        .assert_status_ok();
    server
        .post(&path)
        .add_header(header::AUTHORIZATION, bearer(&alice.token))
        .await
        .assert_status(StatusCode::CONFLICT);

    server
        .delete(&path)
        .add_header(header::AUTHORIZATION, bearer(&alice.token))
        .await
        .assert_status_ok();
    server
        .delete(&path)
        .add_header(header::AUTHORIZATION, bearer(&alice.token))
        .await
        .assert_status_bad_request();
}

#[tokio::test]
async fn comments_need_content_and_an_existing_post() {
    let server = server("blog");
    let alice = register(&server, "alice").await;
    let post = create_post(&server, &alice, false).await;
    let path = format!("/api/posts/{}/comments", post["id"]);

    server
        .post(&path)
        .add_header(header::AUTHORIZATION, bearer(&alice.token))
        .json(&json!({ "content": "   " }))
        .await
        .assert_status_bad_request();

    server
        .post("/api/posts/999/comments")
        .add_header(header::AUTHORIZATION, bearer(&alice.token))
        .json(&json!({ "content": "hi" }))
        .await
        .assert_status_not_found();

    let res = server
        .post(&path)
        .add_header(header::AUTHORIZATION, bearer(&alice.token))
        .json(&json!({ "content": "nice" }))
        .await;
    res.assert_status(StatusCode::CREATED);
    assert_eq!(res.json::<Value>()["comment"]["user"]["name"], "alice");
}

#[tokio::test]
async fn duplicate_email_and_bad_login() {
    let server = server("blog");
    register(&server, "alice").await;

    server
        .post("/api/auth/register")
        .json(&json!({ "name": "x", "email": "alice@example.com", "password": "pw" }))
        .await
        .assert_status(StatusCode::CONFLICT);

    server
        .post("/api/auth/login")
        .json(&json!({ "email": "alice@example.com", "password": "wrong" }))
        .await
        .assert_status_unauthorized();

    let res = server
        .post("/api/auth/login")
        .json(&json!({ "email": "alice@example.com", "password": "password123" }))
        .await;
    res.assert_status_ok();
    assert!(res.json::<Value>()["token"].is_string());
}
