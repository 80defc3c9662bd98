//! Image upload, serving, and bucket status.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;

use catalog_api::extractors::ADMIN_SESSION_HEADER;

use crate::helpers::{MAX_IMAGE_BYTES, TestApp, TestResponse};

const BOUNDARY: &str = "catalog-test-boundary";

async fn upload(
    app: &TestApp,
    session: &str,
    query: &str,
    file_name: &str,
    content_type: &str,
    data: &[u8],
) -> TestResponse {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    let req = Request::builder()
        .method("POST")
        .uri(format!("/api/admin/images{query}"))
        .header(ADMIN_SESSION_HEADER, session)
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    app.send(req).await
}

#[tokio::test]
async fn test_upload_is_served_under_media() {
    let app = TestApp::new().await;
    let session = app.admin_session().await;
    let product_id = uuid::Uuid::new_v4();

    let response = upload(
        &app,
        &session,
        &format!("?product_id={product_id}"),
        "valve.png",
        "image/png",
        b"\x89PNG fake image",
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);

    let url = response.body["data"]["url"].as_str().unwrap().to_string();
    let prefix = "http://localhost:8080/media/product-images/";
    assert!(url.starts_with(prefix), "{url}");
    let key = &url[prefix.len()..];
    assert!(key.starts_with(&product_id.to_string()));
    assert!(key.ends_with(".png"));

    let req = Request::builder()
        .uri(format!("/media/product-images/{key}"))
        .body(Body::empty())
        .unwrap();
    let served = app.send(req).await;
    assert_eq!(served.status, StatusCode::OK);
    assert_eq!(served.raw, b"\x89PNG fake image");
}

#[tokio::test]
async fn test_upload_rejects_non_images_and_oversize() {
    let app = TestApp::new().await;
    let session = app.admin_session().await;

    let text = upload(&app, &session, "", "notes.txt", "text/plain", b"hello").await;
    assert_eq!(text.status, StatusCode::BAD_REQUEST);
    assert_eq!(text.body["error"], "VALIDATION_ERROR");

    let big = vec![0u8; MAX_IMAGE_BYTES as usize + 1];
    let oversize = upload(&app, &session, "", "big.jpg", "image/jpeg", &big).await;
    assert_eq!(oversize.status, StatusCode::BAD_REQUEST);
    assert!(oversize.body["message"].as_str().unwrap().contains("exceeding"));
}

#[tokio::test]
async fn test_upload_requires_admin() {
    let app = TestApp::new().await;
    let response = upload(&app, "", "", "valve.png", "image/png", b"png").await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_deleting_product_removes_uploaded_images() {
    let app = TestApp::new().await;
    let session = app.admin_session().await;
    app.create_category(&session, "Valves", None).await;

    let uploaded = upload(&app, &session, "", "valve.webp", "image/webp", b"webp").await;
    let url = uploaded.body["data"]["url"].as_str().unwrap().to_string();

    let created = app
        .request(
            "POST",
            "/api/admin/products",
            Some(json!({ "name": "Gate Valve", "category": "Valves", "images": [url] })),
            Some(&session),
        )
        .await;
    let id = created.body["data"]["id"].as_str().unwrap().to_string();

    let before = app.request("GET", "/api/admin/storage", None, Some(&session)).await;
    assert_eq!(before.body["data"]["usage"]["file_count"], 1);

    let deleted = app
        .request("DELETE", &format!("/api/admin/products/{id}"), None, Some(&session))
        .await;
    assert_eq!(deleted.status, StatusCode::OK);

    let after = app.request("GET", "/api/admin/storage", None, Some(&session)).await;
    assert_eq!(after.body["data"]["usage"]["file_count"], 0);
}

#[tokio::test]
async fn test_storage_status_reports_bucket() {
    let app = TestApp::new().await;
    let session = app.admin_session().await;

    let response = app.request("GET", "/api/admin/storage", None, Some(&session)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["provider"], "local");
    assert_eq!(response.body["data"]["bucket"], "product-images");
    assert_eq!(response.body["data"]["status"], "exists");
    assert_eq!(response.body["data"]["usage"]["file_count"], 0);
}
