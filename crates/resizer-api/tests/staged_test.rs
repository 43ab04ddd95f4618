//! Staged resize integration tests.
//!
//! Run with: `cargo test -p resizer-api --test staged_test`

mod helpers;

use axum::http::StatusCode;
use helpers::fixtures::{create_test_jpeg, dimensions_of};
use helpers::setup_test_app;
use serde_json::json;

const KEY: &str =
    "2024-03-09/6b86b273ff34fce19d6b804eff5a3f5747ada4eaa22f1d49c01e52ddb7875b4b.jpg";

#[tokio::test]
async fn test_staged_resize_reads_the_uploaded_object() {
    let app = setup_test_app().await;
    app.stage_object(KEY, create_test_jpeg(800, 600)).await;

    let response = app
        .client()
        .post("/resize/staged")
        .json(&json!({ "key": KEY, "width": 400, "fit": "inside" }))
        .await;

    response.assert_status(StatusCode::OK);
    assert_eq!(response.header("content-type"), "image/jpeg");
    assert_eq!(dimensions_of(response.as_bytes()), (400, 300));
}

#[tokio::test]
async fn test_staged_resize_accepts_string_parameters() {
    let app = setup_test_app().await;
    app.stage_object(KEY, create_test_jpeg(800, 600)).await;

    let response = app
        .client()
        .post("/resize/staged")
        .json(&json!({ "key": KEY, "width": "80", "height": "80", "quality": "60" }))
        .await;

    response.assert_status(StatusCode::OK);
    assert_eq!(dimensions_of(response.as_bytes()), (80, 80));
}

#[tokio::test]
async fn test_staged_resize_unknown_key_is_not_found() {
    let app = setup_test_app().await;
    let response = app
        .client()
        .post("/resize/staged")
        .json(&json!({ "key": "2024-03-09/missing.jpg", "width": 100 }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_staged_resize_corrupt_object_is_server_error() {
    let app = setup_test_app().await;
    app.stage_object(KEY, b"GIF89a but not really".to_vec()).await;

    let response = app
        .client()
        .post("/resize/staged")
        .json(&json!({ "key": KEY, "width": 100 }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.text(), "failed to process image");
}

#[tokio::test]
async fn test_staged_resize_missing_key() {
    let app = setup_test_app().await;
    for body in [json!({ "width": 100 }), json!({ "key": "  ", "width": 100 })] {
        let response = app.client().post("/resize/staged").json(&body).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.text(), "missing key");
    }
}

#[tokio::test]
async fn test_staged_resize_validates_before_fetching() {
    let app = setup_test_app().await;
    // The key does not exist; a 404 would mean storage was read first.
    let response = app
        .client()
        .post("/resize/staged")
        .json(&json!({ "key": "2024-03-09/missing.jpg", "width": 100, "fit": "squash" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.text(), "invalid fit");
}

#[tokio::test]
async fn test_staged_resize_rejects_traversal_keys() {
    let app = setup_test_app().await;
    let response = app
        .client()
        .post("/resize/staged")
        .json(&json!({ "key": "../secrets/2024-03-09.jpg", "width": 100 }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_staged_resize_malformed_body() {
    let app = setup_test_app().await;
    let response = app
        .client()
        .post("/resize/staged")
        .content_type("application/json")
        .bytes(bytes::Bytes::from_static(b"{\"key\":"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}
