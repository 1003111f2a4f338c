//! Travel endpoints end to end: everything needs a token, edits are owner
//! only, and `places` are synced on update.

mod common;

use axum::http::header;
use axum_test::TestServer;
use serde_json::{Value, json};

use common::{Account, bearer, register, server};

async fn create_travel(server: &TestServer, owner: &Account) -> Value {
    let res = server
        .post("/api/travels")
        .add_header(header::AUTHORIZATION, bearer(&owner.token))
        .json(&json!({
            "title": "Paris",
            "location": "France",
            "cost": 1200.5,
            "places": [
                { "name": "Louvre" },
                { "name": "Orsay", "visited": true },
                { "description": "nameless, skipped" },
            ],
        }))
        .await;
    res.assert_status_ok();
    res.json::<Value>()["travel"].clone()
}

#[tokio::test]
async fn travels_require_a_token() {
    let server = server("travel");

    server.get("/api/travels").await.assert_status_unauthorized();
    server.get("/api/travels/my").await.assert_status_unauthorized();
}

#[tokio::test]
async fn create_embeds_named_places() {
    let server = server("travel");
    let anna = register(&server, "anna").await;
    let travel = create_travel(&server, &anna).await;

    assert_eq!(travel["user_id"], anna.id);
    let places = travel["places"].as_array().expect("places");
    assert_eq!(places.len(), 2);
    assert_eq!(places[1]["visited"], true);
}

#[tokio::test]
async fn empty_or_incomplete_bodies_are_rejected() {
    let server = server("travel");
    let anna = register(&server, "anna").await;

    let res = server
        .post("/api/travels")
        .add_header(header::AUTHORIZATION, bearer(&anna.token))
        .json(&json!({}))
        .await;
    res.assert_status_bad_request();
    res.assert_json(&json!({ "error": "Invalid JSON" }));

    let res = server
        .post("/api/travels")
        .add_header(header::AUTHORIZATION, bearer(&anna.token))
        .json(&json!({ "location": "Spain" }))
        .await;
    res.assert_json(&json!({ "error": "Field 'title' is required" }));
}

#[tokio::test]
async fn only_the_owner_may_delete_a_travel() {
    let server = server("travel");
    let anna = register(&server, "anna").await;
    let ben = register(&server, "ben").await;
    let travel = create_travel(&server, &anna).await;
    let path = format!("/api/travels/{}", travel["id"]);

    let res = server
        .delete(&path)
        .add_header(header::AUTHORIZATION, bearer(&ben.token))
        .await;
    res.assert_status_forbidden();
    res.assert_json(&json!({ "error": "Access denied" }));

    server
        .get(&path)
        .add_header(header::AUTHORIZATION, bearer(&ben.token))
        .await
        .assert_status_ok();

    server
        .delete(&path)
        .add_header(header::AUTHORIZATION, bearer(&anna.token))
        .await
        .assert_status_ok();
    server
        .get(&path)
        .add_header(header::AUTHORIZATION, bearer(&anna.token))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn update_syncs_places() {
    let server = server("travel");
    let anna = register(&server, "anna").await;
    let travel = create_travel(&server, &anna).await;
    let louvre = travel["places"][0]["id"].as_i64().unwrap();
    let orsay = travel["places"][1]["id"].as_i64().unwrap();

    let res = server
        .put(&format!("/api/travels/{}", travel["id"]))
        .add_header(header::AUTHORIZATION, bearer(&anna.token))
        .json(&json!({
            "title": "Paris again",
            "places": [
                { "id": louvre, "isRemoved": true },
                { "id": orsay, "name": "Musée d'Orsay", "visited": true },
                { "name": "Sainte-Chapelle" },
            ],
        }))
        .await;
    res.assert_status_ok();

    let travel = &res.json::<Value>()["travel"];
    assert_eq!(travel["title"], "Paris again");
    assert_eq!(travel["location"], "France");
    let names: Vec<&str> = travel["places"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|p| p["name"].as_str())
        .collect();
    assert_eq!(names, ["Musée d'Orsay", "Sainte-Chapelle"]);
}

#[tokio::test]
async fn my_travels_only_lists_the_callers() {
    let server = server("travel");
    let anna = register(&server, "anna").await;
    let ben = register(&server, "ben").await;
    create_travel(&server, &anna).await;

    let mine: Value = server
        .get("/api/travels/my")
        .add_header(header::AUTHORIZATION, bearer(&ben.token))
        .await
        .json();
    assert_eq!(mine["travels"], json!([]));

    let all: Value = server
        .get("/api/travels?location=fra")
        .add_header(header::AUTHORIZATION, bearer(&ben.token))
        .await
        .json();
    assert_eq!(all["travels"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn users_can_only_delete_themselves() {
    let server = server("travel");
    let anna = register(&server, "anna").await;
    let ben = register(&server, "ben").await;

    server
        .delete(&format!("/api/users/{}", anna.id))
        .add_header(header::AUTHORIZATION, bearer(&ben.token))
        .await
        .assert_status_forbidden();

    server
        .delete(&format!("/api/users/{}", ben.id))
        .add_header(header::AUTHORIZATION, bearer(&ben.token))
        .await
        .assert_status_ok();

    // The token outlives the account.
    server
        .get("/api/users")
        .add_header(header::AUTHORIZATION, bearer(&ben.token))
        .await
        .assert_status_forbidden();
}
