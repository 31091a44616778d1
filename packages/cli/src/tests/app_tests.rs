use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use pcbuilder_api::{images::LocalImageStore, AppState};
use pcbuilder_security::TokenService;
use pretty_assertions::assert_eq;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use crate::config::{Config, ConfigError};
use crate::create_app;
use crate::middleware::{ClientRateLimiter, RateLimitConfig};

fn test_config(uploads: &TempDir) -> Config {
    Config {
        environment: "test".to_string(),
        debug: true,
        host: "127.0.0.1".to_string(),
        port: 8080,
        allowed_origins: vec!["http://localhost:5173".to_string()],
        database_url: "sqlite::memory:".to_string(),
        db_max_connections: 1,
        jwt_secret: "test-secret".to_string(),
        jwt_ttl_hours: 1,
        image_storage_dir: uploads.path().to_path_buf(),
        image_public_url: "http://localhost:8080".to_string(),
        admin: None,
        rate_limit: RateLimitConfig {
            enabled: false,
            requests_per_minute: 100,
            max_clients: 100,
        },
        request_timeout_secs: 30,
    }
}

async fn build_app(config: &Config) -> Result<Router, ConfigError> {
    let pool = pcbuilder_storage::connect_in_memory().await.unwrap();
    let tokens = TokenService::new(config.jwt_secret.clone(), chrono::Duration::hours(1)).unwrap();
    let store = LocalImageStore::new(&config.image_storage_dir, &config.image_public_url);
    let state = AppState::new(pool, tokens, Arc::new(store));
    let limiter = ClientRateLimiter::new(config.rate_limit.clone());
    create_app(config, state, &limiter)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_route_and_nosniff_header() {
    let uploads = TempDir::new().unwrap();
    let app = build_app(&test_config(&uploads)).await.unwrap();

    let response = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_api_routes_are_mounted() {
    let uploads = TempDir::new().unwrap();
    let app = build_app(&test_config(&uploads)).await.unwrap();

    let response = app.oneshot(get("/api/categories")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], 200);
}

#[tokio::test]
async fn test_cors_preflight_allows_configured_origin() {
    let uploads = TempDir::new().unwrap();
    let app = build_app(&test_config(&uploads)).await.unwrap();

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/components")
        .header(header::ORIGIN, "http://localhost:5173")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization,content-type")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "http://localhost:5173");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    assert_eq!(headers[header::ACCESS_CONTROL_MAX_AGE], "43200");
}

#[tokio::test]
async fn test_cors_ignores_unknown_origin() {
    let uploads = TempDir::new().unwrap();
    let app = build_app(&test_config(&uploads)).await.unwrap();

    let request = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, "https://evil.example.com")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}

#[tokio::test]
async fn test_invalid_origin_is_rejected() {
    let uploads = TempDir::new().unwrap();
    let mut config = test_config(&uploads);
    config.allowed_origins = vec!["http://bad\norigin".to_string()];

    let err = build_app(&config).await.unwrap_err();

    assert_eq!(err, ConfigError::InvalidOrigin("http://bad\norigin".to_string()));
}

#[tokio::test]
async fn test_rate_limit_returns_429_with_retry_after() {
    let uploads = TempDir::new().unwrap();
    let mut config = test_config(&uploads);
    config.rate_limit = RateLimitConfig {
        enabled: true,
        requests_per_minute: 2,
        max_clients: 10,
    };
    let app = build_app(&config).await.unwrap();

    for _ in 0..2 {
        let response = app.clone().oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-ratelimit-limit"], "2");
    }

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let retry_after: u64 = response.headers()[header::RETRY_AFTER]
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!(retry_after >= 1);

    let body = json_body(response).await;
    assert_eq!(body["status"], 429);
    assert_eq!(body["code"], "RATE_LIMIT_EXCEEDED");
}

#[tokio::test]
async fn test_uploaded_images_are_served() {
    let uploads = TempDir::new().unwrap();
    std::fs::create_dir_all(uploads.path().join("components")).unwrap();
    std::fs::write(uploads.path().join("components/cooler.png"), b"png-bytes").unwrap();
    let app = build_app(&test_config(&uploads)).await.unwrap();

    let response = app.oneshot(get("/upload/components/cooler.png")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"png-bytes");
}
