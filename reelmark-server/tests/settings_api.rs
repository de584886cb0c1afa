mod support;

use axum::http::StatusCode;
use serde_json::{Value, json};
use support::{ALICE, TestApp};

#[tokio::test]
async fn unsaved_user_gets_defaults() {
    let app = TestApp::spawn().await;
    let token = app.token_for(ALICE).await;

    let body: Value = app
        .server
        .get("/users/alice/settings")
        .authorization_bearer(&token)
        .await
        .json();

    assert_eq!(body["id"], ALICE);
    assert_eq!(body["applicationLanguage"], "en");
    assert_eq!(body["enableAutoplay"], true);
    assert_eq!(body["proxyUrls"], Value::Null);
}

#[tokio::test]
async fn partial_update_keeps_omitted_fields() {
    let app = TestApp::spawn().await;
    let token = app.token_for(ALICE).await;

    app.server
        .put("/users/alice/settings")
        .authorization_bearer(&token)
        .json(&json!({
            "applicationTheme": "teal",
            "proxyUrls": ["https://proxy.example"],
            "sourceOrder": ["a", "b"]
        }))
        .await
        .assert_status_ok();

    let body: Value = app
        .server
        .put("/users/alice/settings")
        .authorization_bearer(&token)
        .json(&json!({"enableThumbnails": true, "proxyUrls": null}))
        .await
        .json();

    assert_eq!(body["applicationTheme"], "teal");
    assert_eq!(body["sourceOrder"], json!(["a", "b"]));
    assert_eq!(body["enableThumbnails"], true);
    assert_eq!(body["proxyUrls"], Value::Null);

    let stored: Value = app
        .server
        .get("/users/alice/settings")
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(stored, body);
}

#[tokio::test]
async fn null_on_a_toggle_is_rejected_and_nothing_changes() {
    let app = TestApp::spawn().await;
    let token = app.token_for(ALICE).await;

    let response = app
        .server
        .put("/users/alice/settings")
        .authorization_bearer(&token)
        .json(&json!({"applicationTheme": "dark", "enableAutoplay": null}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["violations"][0]["field"], "enableAutoplay");

    let stored: Value = app
        .server
        .get("/users/alice/settings")
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(stored["applicationTheme"], Value::Null);
}
