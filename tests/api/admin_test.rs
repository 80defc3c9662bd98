//! Admin session handling.

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use catalog_database::RoleStore;
use catalog_entity::user::UserRole;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_admin_routes_require_session_header() {
    let app = TestApp::new().await;
    let response = app
        .request("POST", "/api/admin/categories", Some(json!({ "name": "Pumps" })), None)
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_unknown_session_is_rejected() {
    let app = TestApp::new().await;
    let session = Uuid::new_v4().to_string();
    let response = app
        .request("GET", "/api/admin/capabilities", None, Some(&session))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let malformed = app
        .request("GET", "/api/admin/capabilities", None, Some("not-a-uuid"))
        .await;
    assert_eq!(malformed.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_non_admin_cannot_sign_in() {
    let app = TestApp::new().await;
    let user_id = Uuid::new_v4();
    app.store.assign_role(user_id, UserRole::User).await.unwrap();

    let response = app.sign_in(&TestApp::token(user_id)).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let unknown = app.sign_in(&TestApp::token(Uuid::new_v4())).await;
    assert_eq!(unknown.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_bad_token_is_unauthorized() {
    let app = TestApp::new().await;
    let response = app.sign_in("not.a.jwt").await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_role_checked_once_per_session() {
    let app = TestApp::new().await;
    let session = app.admin_session().await;
    let before = app.store.statement_count();

    for _ in 0..3 {
        let response = app
            .request("GET", "/api/admin/capabilities", None, Some(&session))
            .await;
        assert_eq!(response.status, StatusCode::OK);
    }

    // Only the first capabilities read probes the schema.
    assert_eq!(app.store.statement_count(), before + 1);
}

#[tokio::test]
async fn test_sign_out_invalidates_session() {
    let app = TestApp::new().await;
    let session = app.admin_session().await;

    let signed_out = app
        .request("DELETE", "/api/admin/session", None, Some(&session))
        .await;
    assert_eq!(signed_out.status, StatusCode::OK);
    assert_eq!(signed_out.body["data"]["signed_out"], true);

    let rejected = app
        .request("POST", "/api/admin/categories", Some(json!({ "name": "Pumps" })), Some(&session))
        .await;
    assert_eq!(rejected.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_capabilities_report_missing_columns() {
    let app = TestApp::with_schema(catalog_core::types::SchemaCapabilities::legacy()).await;
    let session = app.admin_session().await;

    let response = app
        .request("GET", "/api/admin/capabilities", None, Some(&session))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["capabilities"]["category_hierarchy"], false);
    assert_eq!(response.body["data"]["missing"].as_array().unwrap().len(), 2);

    app.store
        .set_schema(catalog_core::types::SchemaCapabilities::full())
        .await;
    let refreshed = app
        .request("POST", "/api/admin/capabilities/refresh", None, Some(&session))
        .await;
    assert_eq!(refreshed.status, StatusCode::OK);
    assert!(refreshed.body["data"]["missing"].as_array().unwrap().is_empty());
}
