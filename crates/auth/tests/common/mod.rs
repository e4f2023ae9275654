#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Method, Request, Response},
    Router,
};
use http_body_util::BodyExt;
use tower::ServiceExt;
use uapp_auth::{
    config::{AdminSeed, Config},
    db, AppState,
};
use uapp_common::db::Database;

pub const TEST_SECRET: &str = "integration-test-secret-with-enough-bytes";

pub fn test_config() -> Config {
    Config {
        port: 0,
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: TEST_SECRET.to_string(),
        jwt_expiry_hours: 1,
        admin: AdminSeed::default(),
    }
}

pub async fn test_state() -> AppState {
    test_state_with(&test_config()).await
}

pub async fn test_state_with(config: &Config) -> AppState {
    let db = Database::connect_in_memory()
        .await
        .expect("in-memory database should open");
    db::run_migrations(&db)
        .await
        .expect("migrations should apply");
    AppState::new(db, config)
}

pub fn build_test_app(state: AppState) -> Router {
    uapp_auth::app(state)
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).expect("body should be JSON")
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).expect("body should be UTF-8")
}
