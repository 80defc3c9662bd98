//! Behavior against partially migrated schemas and store outages.

use axum::http::StatusCode;
use serde_json::json;

use catalog_core::types::{SchemaCapabilities, SchemaGap};

use crate::helpers::TestApp;

#[tokio::test]
async fn test_product_create_without_gallery_column() {
    let schema = SchemaCapabilities::full().without(SchemaGap::ProductGallery);
    let app = TestApp::with_schema(schema).await;
    let session = app.admin_session().await;
    app.create_category(&session, "Valves", None).await;

    let created = app
        .request(
            "POST",
            "/api/admin/products",
            Some(json!({
                "name": "Gate Valve",
                "category": "Valves",
                "images": ["https://cdn.example/a.png", "https://cdn.example/b.png"]
            })),
            Some(&session),
        )
        .await;

    assert_eq!(created.status, StatusCode::CREATED, "{:?}", created.body);
    let data = &created.body["data"];
    assert_eq!(data["image"], "https://cdn.example/a.png");
    assert!(data["images"].is_null());
    assert_eq!(data["gallery"], json!(["https://cdn.example/a.png"]));
}

#[tokio::test]
async fn test_subcategory_needs_hierarchy_column() {
    let app = TestApp::with_schema(SchemaCapabilities::legacy()).await;
    let session = app.admin_session().await;
    let valves = app.create_category(&session, "Valves", None).await;

    let response = app
        .request(
            "POST",
            "/api/admin/categories",
            Some(json!({ "name": "Ball Valves", "parent_id": valves })),
            Some(&session),
        )
        .await;

    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.body["error"], "MIGRATION_REQUIRED");
    assert_eq!(response.body["transient"], false);
    assert_eq!(response.body["details"]["table"], "product_categories");
    assert_eq!(response.body["details"]["column"], "parent_id");
    assert_eq!(
        response.body["details"]["migration"],
        "0002_category_hierarchy.sql"
    );

    // Nothing was written, and the flat list still works.
    let listed = app.request("GET", "/api/categories", None, None).await;
    assert_eq!(listed.status, StatusCode::OK);
    let names: Vec<_> = listed.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Valves".to_string()]);
}

#[tokio::test]
async fn test_legacy_tree_is_flat() {
    let app = TestApp::with_schema(SchemaCapabilities::legacy()).await;
    let session = app.admin_session().await;
    app.create_category(&session, "Valves", None).await;
    app.create_category(&session, "Pumps", None).await;

    let tree = app.request("GET", "/api/categories/tree", None, None).await;
    assert_eq!(tree.status, StatusCode::OK);
    let roots = tree.body["data"]["roots"].as_array().unwrap();
    assert_eq!(roots.len(), 2);
    assert!(roots.iter().all(|r| r["children"].as_array().unwrap().is_empty()));
}

#[tokio::test]
async fn test_store_outage_is_transient() {
    let app = TestApp::new().await;
    let session = app.admin_session().await;
    app.store.set_offline(true);

    let listed = app.request("GET", "/api/categories", None, None).await;
    assert_eq!(listed.status, StatusCode::BAD_GATEWAY);
    assert_eq!(listed.body["error"], "STORE_UNAVAILABLE");
    assert_eq!(listed.body["transient"], true);

    let created = app
        .request("POST", "/api/admin/categories", Some(json!({ "name": "Pumps" })), Some(&session))
        .await;
    assert_eq!(created.status, StatusCode::BAD_GATEWAY);

    let health = app.request("GET", "/api/health", None, None).await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.body["data"]["status"], "degraded");
    assert_eq!(health.body["data"]["database_reachable"], false);

    app.store.set_offline(false);
    let recovered = app.request("GET", "/api/categories", None, None).await;
    assert_eq!(recovered.status, StatusCode::OK);

    let health = app.request("GET", "/api/health", None, None).await;
    assert_eq!(health.body["data"]["status"], "ok");
    assert_eq!(health.body["data"]["database_reachable"], true);
}
