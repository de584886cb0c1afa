mod support;

use axum::http::StatusCode;
use serde_json::{Value, json};
use support::{ALICE, BOB, TestApp};

fn bookmark(group: Value) -> Value {
    json!({
        "meta": {"title": "The Bear", "year": 2022, "type": "show"},
        "group": group,
        "favoriteEpisodes": ["s2e7"]
    })
}

#[tokio::test]
async fn save_replaces_and_lists_one_bookmark_per_title() {
    let app = TestApp::spawn().await;
    let token = app.token_for(ALICE).await;

    let first = app
        .server
        .post("/users/alice/bookmarks/136315")
        .authorization_bearer(&token)
        .json(&bookmark(json!("kitchen")))
        .await;
    first.assert_status_ok();
    let first: Value = first.json();
    assert_eq!(first["tmdbId"], "136315");
    assert_eq!(first["group"], json!(["kitchen"]));
    assert_eq!(first["favoriteEpisodes"], json!(["s2e7"]));
    assert!(first["updatedAt"].is_string());

    app.server
        .post("/users/alice/bookmarks/136315")
        .authorization_bearer(&token)
        .json(&bookmark(json!(["comfort", "fx"])))
        .await
        .assert_status_ok();

    let list: Vec<Value> = app
        .server
        .get("/users/alice/bookmarks")
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["group"], json!(["comfort", "fx"]));
}

#[tokio::test]
async fn legacy_flat_body_is_accepted() {
    let app = TestApp::spawn().await;
    let token = app.token_for(ALICE).await;

    let body: Value = app
        .server
        .post("/users/alice/bookmarks/329865")
        .authorization_bearer(&token)
        .json(&json!({"title": "Arrival", "year": 2016, "type": "movie"}))
        .await
        .json();

    assert_eq!(body["meta"]["title"], "Arrival");
    assert_eq!(body["meta"]["type"], "movie");
    assert_eq!(body["group"], json!([]));
}

#[tokio::test]
async fn missing_year_is_a_validation_error() {
    let app = TestApp::spawn().await;
    let token = app.token_for(ALICE).await;

    let response = app
        .server
        .post("/users/alice/bookmarks/329865")
        .authorization_bearer(&token)
        .json(&json!({"meta": {"title": "Arrival", "type": "movie"}}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["violations"][0]["field"], "meta.year");
}

#[tokio::test]
async fn delete_is_idempotent() {
    let app = TestApp::spawn().await;
    let token = app.token_for(ALICE).await;

    app.server
        .post("/users/alice/bookmarks/136315")
        .authorization_bearer(&token)
        .json(&bookmark(json!([])))
        .await
        .assert_status_ok();

    for _ in 0..2 {
        let response = app
            .server
            .delete("/users/alice/bookmarks/136315")
            .authorization_bearer(&token)
            .await;
        response.assert_status_ok();
        assert_eq!(
            response.json::<Value>(),
            json!({"success": true, "tmdbId": "136315"})
        );
    }

    let list: Vec<Value> = app
        .server
        .get("/users/alice/bookmarks")
        .authorization_bearer(&token)
        .await
        .json();
    assert!(list.is_empty());
}

#[tokio::test]
async fn another_users_bookmarks_are_forbidden() {
    let app = TestApp::spawn().await;
    let alice = app.token_for(ALICE).await;
    let bob = app.token_for(BOB).await;

    app.server
        .post("/users/alice/bookmarks/136315")
        .authorization_bearer(&alice)
        .json(&bookmark(json!([])))
        .await
        .assert_status_ok();

    app.server
        .delete("/users/alice/bookmarks/136315")
        .authorization_bearer(&bob)
        .await
        .assert_status(StatusCode::FORBIDDEN);
    app.server
        .get("/users/alice/bookmarks")
        .authorization_bearer(&bob)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let list: Vec<Value> = app
        .server
        .get("/users/alice/bookmarks")
        .authorization_bearer(&alice)
        .await
        .json();
    assert_eq!(list.len(), 1);
}
