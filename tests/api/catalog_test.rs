//! Public browsing and admin CRUD through the HTTP API.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;
    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["data"]["status"], "ok");
    assert_eq!(response.body["data"]["database_reachable"], true);
}

#[tokio::test]
async fn test_created_category_is_listed_once() {
    let app = TestApp::new().await;
    let session = app.admin_session().await;
    let id = app.create_category(&session, "Pumps", None).await;

    let response = app.request("GET", "/api/categories", None, None).await;
    assert_eq!(response.status, StatusCode::OK);

    let listed: Vec<_> = response.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|c| c["id"] == id.as_str())
        .collect();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["name"], "Pumps");
}

#[tokio::test]
async fn test_valves_tree_and_delete_rules() {
    let app = TestApp::new().await;
    let session = app.admin_session().await;
    let valves = app.create_category(&session, "Valves", None).await;
    let ball = app.create_category(&session, "Ball Valves", Some(&valves)).await;

    let tree = app.request("GET", "/api/categories/tree", None, None).await;
    assert_eq!(tree.status, StatusCode::OK);
    let roots = tree.body["data"]["roots"].as_array().unwrap();
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0]["name"], "Valves");
    assert_eq!(roots[0]["children"][0]["name"], "Ball Valves");

    // Parent with a child cannot be deleted.
    let blocked = app
        .request("DELETE", &format!("/api/admin/categories/{valves}"), None, Some(&session))
        .await;
    assert_eq!(blocked.status, StatusCode::CONFLICT);
    assert_eq!(blocked.body["error"], "HAS_CHILDREN");

    // A product in the child blocks deleting the child.
    let product = app
        .request(
            "POST",
            "/api/admin/products",
            Some(json!({ "name": "Brass Ball Valve", "category": "Ball Valves" })),
            Some(&session),
        )
        .await;
    assert_eq!(product.status, StatusCode::CREATED, "{:?}", product.body);
    let product_id = product.body["data"]["id"].as_str().unwrap().to_string();

    let blocked = app
        .request("DELETE", &format!("/api/admin/categories/{ball}"), None, Some(&session))
        .await;
    assert_eq!(blocked.status, StatusCode::CONFLICT);
    assert_eq!(blocked.body["error"], "HAS_PRODUCTS");

    // Remove the product, then the child, then the parent.
    let deleted = app
        .request("DELETE", &format!("/api/admin/products/{product_id}"), None, Some(&session))
        .await;
    assert_eq!(deleted.status, StatusCode::OK);
    for id in [&ball, &valves] {
        let deleted = app
            .request("DELETE", &format!("/api/admin/categories/{id}"), None, Some(&session))
            .await;
        assert_eq!(deleted.status, StatusCode::OK, "{:?}", deleted.body);
        assert_eq!(deleted.body["data"]["deleted"], true);
    }

    let listed = app.request("GET", "/api/categories", None, None).await;
    assert!(listed.body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_move_category_to_top_level() {
    let app = TestApp::new().await;
    let session = app.admin_session().await;
    let valves = app.create_category(&session, "Valves", None).await;
    let ball = app.create_category(&session, "Ball Valves", Some(&valves)).await;

    let moved = app
        .request(
            "PUT",
            &format!("/api/admin/categories/{ball}"),
            Some(json!({ "parent_id": null })),
            Some(&session),
        )
        .await;
    assert_eq!(moved.status, StatusCode::OK, "{:?}", moved.body);
    assert!(moved.body["data"]["parent_id"].is_null());
    assert_eq!(moved.body["data"]["name"], "Ball Valves");
}

#[tokio::test]
async fn test_product_gallery_and_display_fields() {
    let app = TestApp::new().await;
    let session = app.admin_session().await;
    app.create_category(&session, "Valves", None).await;

    let created = app
        .request(
            "POST",
            "/api/admin/products",
            Some(json!({
                "name": "Gate Valve",
                "category": "Valves",
                "images": [
                    "https://drive.google.com/file/d/ABC123/view",
                    "https://cdn.example/b.png",
                    "https://cdn.example/c.png"
                ],
                "specifications": [
                    { "key": "Size", "value": "DN50" },
                    { "key": "", "value": "orphan" },
                    { "key": "Material", "value": "Brass" }
                ]
            })),
            Some(&session),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED, "{:?}", created.body);
    let id = created.body["data"]["id"].as_str().unwrap().to_string();

    let fetched = app.request("GET", &format!("/api/products/{id}"), None, None).await;
    assert_eq!(fetched.status, StatusCode::OK);
    let data = &fetched.body["data"];
    assert_eq!(data["image"], "https://drive.google.com/file/d/ABC123/view");
    assert_eq!(data["images"].as_array().unwrap().len(), 3);
    assert!(data["display_image"].as_str().unwrap().contains("id=ABC123"));
    assert_eq!(data["gallery"].as_array().unwrap().len(), 3);
    assert_eq!(data["gallery"][1], "https://cdn.example/b.png");

    let specs = data["specifications"].as_array().unwrap();
    assert_eq!(specs.len(), 2);
    assert_eq!(specs[0]["key"], "Size");
    assert_eq!(specs[1]["key"], "Material");
}

#[tokio::test]
async fn test_product_filter_and_unknown_category() {
    let app = TestApp::new().await;
    let session = app.admin_session().await;
    app.create_category(&session, "Valves", None).await;
    app.create_category(&session, "Pumps", None).await;

    for (name, category) in [("Gate Valve", "Valves"), ("Booster", "Pumps")] {
        let response = app
            .request(
                "POST",
                "/api/admin/products",
                Some(json!({ "name": name, "category": category })),
                Some(&session),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
    }

    let pumps = app.request("GET", "/api/products?category=Pumps", None, None).await;
    let pumps = pumps.body["data"].as_array().unwrap();
    assert_eq!(pumps.len(), 1);
    assert_eq!(pumps[0]["name"], "Booster");

    let all = app.request("GET", "/api/products", None, None).await;
    assert_eq!(all.body["data"].as_array().unwrap().len(), 2);

    let rejected = app
        .request(
            "POST",
            "/api/admin/products",
            Some(json!({ "name": "Ghost", "category": "Nowhere" })),
            Some(&session),
        )
        .await;
    assert_eq!(rejected.status, StatusCode::BAD_REQUEST);
    assert_eq!(rejected.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_missing_product_is_404() {
    let app = TestApp::new().await;
    let response = app
        .request("GET", &format!("/api/products/{}", uuid::Uuid::new_v4()), None, None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "NOT_FOUND");
    assert_eq!(response.body["transient"], false);
}

#[tokio::test]
async fn test_missing_required_fields_are_validation_errors() {
    let app = TestApp::new().await;
    let session = app.admin_session().await;
    app.create_category(&session, "Valves", None).await;

    let product = app
        .request(
            "POST",
            "/api/admin/products",
            Some(json!({ "category": "Valves" })),
            Some(&session),
        )
        .await;
    assert_eq!(product.status, StatusCode::BAD_REQUEST);
    assert_eq!(product.body["error"], "VALIDATION_ERROR");
    assert_eq!(product.body["transient"], false);

    let category = app
        .request("POST", "/api/admin/categories", Some(json!({})), Some(&session))
        .await;
    assert_eq!(category.status, StatusCode::BAD_REQUEST);
    assert_eq!(category.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_malformed_body_uses_error_envelope() {
    let app = TestApp::new().await;
    let session = app.admin_session().await;

    let wrong_type = app
        .request(
            "POST",
            "/api/admin/categories",
            Some(json!({ "name": 42 })),
            Some(&session),
        )
        .await;
    assert_eq!(wrong_type.status, StatusCode::BAD_REQUEST);
    assert_eq!(wrong_type.body["error"], "VALIDATION_ERROR");
    assert!(wrong_type.body["message"].as_str().is_some());
}
