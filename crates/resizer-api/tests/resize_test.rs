//! Direct resize integration tests.
//!
//! Run with: `cargo test -p resizer-api --test resize_test`

mod helpers;

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use helpers::fixtures::{create_test_jpeg, create_test_png, dimensions_of};
use helpers::{setup_test_app, setup_unconfigured_app};

fn image_part(data: Vec<u8>) -> Part {
    Part::bytes(bytes::Bytes::from(data))
        .file_name("photo.jpg")
        .mime_type("image/jpeg")
}

fn form(data: Vec<u8>, fields: &[(&str, &str)]) -> MultipartForm {
    fields
        .iter()
        .fold(MultipartForm::new().add_part("image", image_part(data)), |form, (k, v)| {
            form.add_text(*k, *v)
        })
}

#[tokio::test]
async fn test_resize_width_only_keeps_aspect_ratio() {
    let app = setup_test_app().await;
    let response = app
        .client()
        .post("/resize")
        .multipart(form(
            create_test_jpeg(600, 400),
            &[("width", "300"), ("height", ""), ("fit", "cover")],
        ))
        .await;

    response.assert_status(StatusCode::OK);
    assert_eq!(response.header("content-type"), "image/jpeg");
    assert_eq!(dimensions_of(response.as_bytes()), (300, 200));
}

#[tokio::test]
async fn test_resize_defaults_to_cover() {
    let app = setup_test_app().await;
    let response = app
        .client()
        .post("/resize")
        .multipart(form(
            create_test_jpeg(600, 400),
            &[("width", "100"), ("height", "100")],
        ))
        .await;

    response.assert_status(StatusCode::OK);
    assert_eq!(dimensions_of(response.as_bytes()), (100, 100));
}

#[tokio::test]
async fn test_resize_every_fit_mode() {
    let app = setup_test_app().await;
    let cases = [
        ("cover", (200, 200)),
        ("contain", (200, 200)),
        ("fill", (200, 200)),
        ("inside", (200, 133)),
        ("outside", (300, 200)),
    ];

    for (fit, expected) in cases {
        let response = app
            .client()
            .post("/resize")
            .multipart(form(
                create_test_jpeg(600, 400),
                &[("width", "200"), ("height", "200"), ("fit", fit)],
            ))
            .await;
        response.assert_status(StatusCode::OK);
        assert_eq!(dimensions_of(response.as_bytes()), expected, "fit={fit}");
    }
}

#[tokio::test]
async fn test_resize_accepts_png_input() {
    let app = setup_test_app().await;
    let response = app
        .client()
        .post("/resize")
        .multipart(form(create_test_png(64, 32), &[("height", "16")]))
        .await;

    response.assert_status(StatusCode::OK);
    assert_eq!(dimensions_of(response.as_bytes()), (32, 16));
}

#[tokio::test]
async fn test_resize_is_deterministic() {
    let app = setup_test_app().await;
    let source = create_test_jpeg(320, 240);
    let fields = [("width", "160"), ("quality", "80"), ("fit", "inside")];

    let first = app
        .client()
        .post("/resize")
        .multipart(form(source.clone(), &fields))
        .await;
    let second = app
        .client()
        .post("/resize")
        .multipart(form(source, &fields))
        .await;

    first.assert_status(StatusCode::OK);
    second.assert_status(StatusCode::OK);
    assert_eq!(first.as_bytes(), second.as_bytes());
}

#[tokio::test]
async fn test_resize_validation_messages() {
    let app = setup_test_app().await;
    let cases: [(&[(&str, &str)], &str); 6] = [
        (&[("width", ""), ("height", "")], "missing width and height"),
        (&[], "missing width and height"),
        (&[("width", "-5")], "non-decimal width or height"),
        (&[("width", "100"), ("quality", "150")], "invalid quality value (1 - 100)"),
        (&[("width", "100"), ("fit", "")], "missing fit"),
        (&[("width", "100"), ("fit", "stretch")], "invalid fit"),
    ];

    for (fields, message) in cases {
        let response = app
            .client()
            .post("/resize")
            .multipart(form(create_test_jpeg(40, 40), fields))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.text(), message);
    }
}

#[tokio::test]
async fn test_resize_rejects_oversized_dimension() {
    let app = setup_test_app().await;
    let response = app
        .client()
        .post("/resize")
        .multipart(form(create_test_jpeg(40, 40), &[("width", "70000")]))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.text(), "width or height exceeds 65500 pixels");
}

#[tokio::test]
async fn test_resize_rejects_oversized_area() {
    let app = setup_test_app().await;
    let response = app
        .client()
        .post("/resize")
        .multipart(form(
            create_test_jpeg(40, 40),
            &[("width", "20000"), ("height", "20000"), ("fit", "fill")],
        ))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.text(), "requested size exceeds 268402689 pixels");
}

#[tokio::test]
async fn test_resize_rejects_oversized_inferred_area() {
    let app = setup_test_app().await;
    let response = app
        .client()
        .post("/resize")
        .multipart(form(create_test_jpeg(300, 200), &[("width", "65500")]))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.text(),
        "output 65500x43667 exceeds the maximum image size"
    );
}

#[tokio::test]
async fn test_resize_without_image_is_empty_image() {
    let app = setup_test_app().await;

    let missing = app
        .client()
        .post("/resize")
        .multipart(MultipartForm::new().add_text("width", "100"))
        .await;
    missing.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(missing.text(), "empty image");

    // Checked before the parameters.
    let empty = app
        .client()
        .post("/resize")
        .multipart(form(Vec::new(), &[("fit", "bogus")]))
        .await;
    empty.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(empty.text(), "empty image");
}

#[tokio::test]
async fn test_resize_undecodable_image_is_server_error() {
    let app = setup_test_app().await;
    let response = app
        .client()
        .post("/resize")
        .multipart(form(b"definitely not an image".to_vec(), &[("width", "10")]))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.text(), "failed to process image");
}

#[tokio::test]
async fn test_resize_body_over_limit_is_rejected() {
    let app = setup_test_app().await;
    let oversized = vec![0u8; 2 * 1024 * 1024];
    let response = app
        .client()
        .post("/resize")
        .multipart(form(oversized, &[("width", "10")]))
        .await;

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_resize_works_without_storage_settings() {
    let server = setup_unconfigured_app().await;
    let response = server
        .post("/resize")
        .multipart(form(create_test_jpeg(60, 40), &[("width", "30")]))
        .await;

    response.assert_status(StatusCode::OK);
    assert_eq!(dimensions_of(response.as_bytes()), (30, 20));
}

#[tokio::test]
async fn test_unsupported_methods_are_not_found() {
    let app = setup_test_app().await;
    app.client()
        .get("/resize")
        .await
        .assert_status(StatusCode::NOT_FOUND);
    app.client()
        .delete("/upload-url")
        .await
        .assert_status(StatusCode::NOT_FOUND);
    app.client()
        .get("/nowhere")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health() {
    let app = setup_test_app().await;
    let response = app.client().get("/health").await;
    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body, serde_json::json!({ "status": "alive" }));
}
