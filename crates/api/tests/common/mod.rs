#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use issueflow_api::app::{build_app, build_cors_layer};
use issueflow_api::config::ServerConfig;
use issueflow_api::state::AppState;
use issueflow_db::models::issue_type::CreateIssueType;
use issueflow_db::models::status::CreateStatus;
use issueflow_db::repositories::{IssueTypeRepo, StatusRepo};
use sqlx::PgPool;
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        database_url: String::new(),
        db_max_connections: 5,
    }
}

/// Build the full application router, with the production middleware
/// stack, over the given pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let cors = build_cors_layer(&config).unwrap();
    let state = AppState {
        pool,
        config: Arc::new(config),
    };
    build_app(state, cors)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a status directly through the repository and return its id.
pub async fn seed_status(pool: &PgPool, name: &str) -> i64 {
    StatusRepo::create(
        pool,
        &CreateStatus {
            name: name.to_string(),
            description: None,
            color: Some("#888888".to_string()),
            sort_order: None,
        },
    )
    .await
    .unwrap()
    .id
}

/// Insert an issue type directly through the repository and return its id.
pub async fn seed_issue_type(pool: &PgPool, name: &str) -> i64 {
    IssueTypeRepo::create(
        pool,
        &CreateIssueType {
            name: name.to_string(),
            color: None,
            icon: None,
        },
    )
    .await
    .unwrap()
    .id
}
