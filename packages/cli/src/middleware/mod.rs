//! Middleware for rate limiting and panic recovery

pub mod rate_limit;

pub use rate_limit::{rate_limit_middleware, ClientRateLimiter, RateLimitConfig};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pcbuilder_api::error::ErrorResponse;
use tower_http::catch_panic::CatchPanicLayer;
use tracing::error;
use uuid::Uuid;

/// Create a panic handler that answers with the standard error body
pub fn create_panic_handler() -> CatchPanicLayer<fn(Box<dyn std::any::Any + Send + 'static>) -> Response> {
    CatchPanicLayer::custom(handle_panic)
}

fn handle_panic(err: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let request_id = Uuid::new_v4().to_string();

    let panic_message = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic occurred"
    };

    error!(
        request_id = %request_id,
        panic_message = %panic_message,
        "Server panic occurred"
    );

    // Panic payloads never reach the client, even in debug mode
    let body = ErrorResponse {
        status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
        message: "An internal server error occurred".to_string(),
        code: "INTERNAL_ERROR",
        request_id,
        error: None,
    };

    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[tokio::test]
    async fn test_panic_handler_response_format() {
        let response = handle_panic(Box::new("db handle vanished".to_string()));

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&body_bytes).unwrap();

        assert_eq!(body["status"], 500);
        assert_eq!(body["code"], "INTERNAL_ERROR");
        assert_eq!(body["message"], "An internal server error occurred");
        assert!(body["request_id"].is_string());
        assert!(body.get("error").is_none());

        let raw = String::from_utf8_lossy(&body_bytes);
        assert!(!raw.contains("db handle vanished"));
    }

    #[tokio::test]
    async fn test_panicking_handler_is_caught() {
        use axum::{body::Body, http::Request, routing::get, Router};
        use tower::ServiceExt;

        let app = Router::new()
            .route(
                "/boom",
                get(|| async {
                    if true {
                        panic!("handler blew up");
                    }
                    "unreachable"
                }),
            )
            .layer(create_panic_handler());

        let response = app
            .oneshot(Request::builder().uri("/boom").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["code"], "INTERNAL_ERROR");
    }
}
