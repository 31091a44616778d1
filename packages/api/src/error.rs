// ABOUTME: Application error type and its HTTP mapping
// ABOUTME: Converts domain errors to status codes, error codes and sanitized messages

use std::sync::atomic::{AtomicBool, Ordering};

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    extract::multipart::MultipartError,
    http::{header::RETRY_AFTER, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use pcbuilder_catalog::CatalogError;
use pcbuilder_components::ComponentError;
use pcbuilder_security::{TokenError, UserError};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

use crate::images::ImageError;

static DEBUG_ERRORS: AtomicBool = AtomicBool::new(false);

/// Include raw error detail in error responses. Off in production.
pub fn set_debug_errors(enabled: bool) {
    DEBUG_ERRORS.store(enabled, Ordering::Relaxed);
}

pub fn debug_errors_enabled() -> bool {
    DEBUG_ERRORS.load(Ordering::Relaxed)
}

/// Main application error type that all handlers return
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid request: {detail}")]
    BadRequest { message: String, detail: String },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Rate limit exceeded")]
    RateLimited { retry_after: u64 },

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

/// Structured error response format
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub message: String,
    pub code: &'static str,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn bad_request(message: impl Into<String>, detail: impl ToString) -> Self {
        Self::BadRequest {
            message: message.into(),
            detail: detail.to_string(),
        }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }

    pub fn to_status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::BadRequest { .. } => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            AppError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            AppError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            AppError::RateLimited { .. } => (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMIT_EXCEEDED"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    /// User-facing message. Internal failures never leak their cause here.
    pub fn to_user_message(&self) -> String {
        match self {
            AppError::Validation(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg) => msg.clone(),
            AppError::BadRequest { message, .. } => message.clone(),
            AppError::RateLimited { .. } => "Too many requests. Please try again later".to_string(),
            AppError::Internal(_) => "An internal server error occurred".to_string(),
        }
    }

    fn detail(&self) -> Option<String> {
        match self {
            AppError::BadRequest { detail, .. } => Some(detail.clone()),
            AppError::Internal(err) => Some(format!("{:#}", err)),
            _ => None,
        }
    }

    /// Build the response body; `debug` controls whether raw detail is attached
    pub fn to_body(&self, request_id: String, debug: bool) -> ErrorResponse {
        let (status, code) = self.to_status_and_code();
        ErrorResponse {
            status: status.as_u16(),
            message: self.to_user_message(),
            code,
            request_id,
            error: if debug { self.detail() } else { None },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let request_id = Uuid::new_v4().to_string();
        let (status_code, error_code) = self.to_status_and_code();

        match &self {
            AppError::Internal(err) => {
                error!(
                    request_id = %request_id,
                    error = %format!("{:#}", err),
                    "Internal server error occurred"
                );
            }
            AppError::RateLimited { retry_after } => {
                tracing::warn!(
                    request_id = %request_id,
                    retry_after = %retry_after,
                    "Rate limit exceeded"
                );
            }
            _ => {
                info!(
                    request_id = %request_id,
                    error_code = %error_code,
                    error = %self,
                    "API error response"
                );
            }
        }

        let body = self.to_body(request_id, debug_errors_enabled());
        let mut response = (status_code, Json(body)).into_response();

        if let AppError::RateLimited { retry_after } = &self {
            if let Ok(value) = HeaderValue::from_str(&retry_after.to_string()) {
                response.headers_mut().insert(RETRY_AFTER, value);
            }
        }

        response
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, AppError>;

impl From<ComponentError> for AppError {
    fn from(err: ComponentError) -> Self {
        match err {
            ComponentError::NotFound(_) => AppError::NotFound(err.to_string()),
            ComponentError::Duplicate(_) => AppError::Conflict(err.to_string()),
            ComponentError::Storage(e) => AppError::Internal(e.into()),
            other => AppError::Validation(other.to_string()),
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Validation(msg) => AppError::Validation(msg),
            CatalogError::NotFound(_) => AppError::NotFound(err.to_string()),
            CatalogError::Duplicate(_) => AppError::Conflict(err.to_string()),
            CatalogError::Storage(e) => AppError::Internal(e.into()),
        }
    }
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::Validation(msg) => AppError::Validation(msg),
            UserError::DuplicateEmail => AppError::Conflict("Email already exists".to_string()),
            UserError::InvalidCredentials => AppError::Unauthorized(err.to_string()),
            UserError::NotFound => AppError::NotFound(err.to_string()),
            UserError::Password(e) => AppError::Internal(e.into()),
            UserError::Storage(e) => AppError::Internal(e.into()),
        }
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::EmptySecret | TokenError::Encoding(_) => AppError::Internal(err.into()),
            _ => AppError::Unauthorized("Invalid or expired token".to_string()),
        }
    }
}

impl From<ImageError> for AppError {
    fn from(err: ImageError) -> Self {
        match err {
            ImageError::NotFound(_) => AppError::NotFound(err.to_string()),
            ImageError::Io(_) => AppError::Internal(err.into()),
            _ => AppError::Validation(err.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::bad_request("Invalid request body", rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::bad_request("Invalid query parameters", rejection.body_text())
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::bad_request("Invalid form data", err.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_errors_map_to_taxonomy() {
        let cases = [
            (ComponentError::Validation("name is required".into()), StatusCode::BAD_REQUEST),
            (ComponentError::InvalidCategory("nope".into()), StatusCode::BAD_REQUEST),
            (ComponentError::InvalidBrand("nope".into()), StatusCode::BAD_REQUEST),
            (ComponentError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ComponentError::Duplicate("x".into()), StatusCode::CONFLICT),
        ];
        for (err, expected) in cases {
            let (status, _) = AppError::from(err).to_status_and_code();
            assert_eq!(status, expected);
        }
    }

    #[test]
    fn test_token_errors_are_unauthorized() {
        let (status, code) = AppError::from(TokenError::Expired).to_status_and_code();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(code, "UNAUTHORIZED");
    }

    #[test]
    fn test_rate_limited_sets_retry_after() {
        let response = AppError::RateLimited { retry_after: 7 }.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[RETRY_AFTER], "7");
    }

    #[test]
    fn test_internal_message_is_sanitized() {
        let err = AppError::internal(anyhow::anyhow!("database locked at /var/db/secret.db"));
        let body = err.to_body("req-1".to_string(), false);
        assert_eq!(body.status, 500);
        assert_eq!(body.message, "An internal server error occurred");
        assert!(body.error.is_none());

        let body = err.to_body("req-1".to_string(), true);
        assert!(body.error.unwrap().contains("database locked"));
    }

    #[test]
    fn test_validation_detail_only_in_debug() {
        let err = AppError::bad_request("Invalid request body", "missing field `name`");
        let body = serde_json::to_value(err.to_body("r".into(), false)).unwrap();
        assert_eq!(body["message"], "Invalid request body");
        assert_eq!(body["code"], "BAD_REQUEST");
        assert!(body.get("error").is_none());

        let body = serde_json::to_value(err.to_body("r".into(), true)).unwrap();
        assert_eq!(body["error"], "missing field `name`");
    }
}
