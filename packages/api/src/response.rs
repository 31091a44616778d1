// ABOUTME: Shared API response envelope
// ABOUTME: Every successful endpoint answers with {status, message, response?}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson, Response},
};
use serde::Serialize;

/// Standard API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn with_status(status: StatusCode, message: impl Into<String>, response: Option<T>) -> Self {
        ApiResponse {
            status: status.as_u16(),
            message: message.into(),
            response,
        }
    }

    /// 200 OK
    pub fn ok(message: impl Into<String>, response: T) -> Self {
        Self::with_status(StatusCode::OK, message, Some(response))
    }

    /// 201 Created
    pub fn created(message: impl Into<String>, response: T) -> Self {
        Self::with_status(StatusCode::CREATED, message, Some(response))
    }
}

impl ApiResponse<()> {
    pub fn message(status: StatusCode, message: impl Into<String>) -> Self {
        Self::with_status(status, message, None)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::OK);
        (status, ResponseJson(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_shape() {
        let body = serde_json::to_value(ApiResponse::created("Created", vec![1, 2])).unwrap();
        assert_eq!(body["status"], 201);
        assert_eq!(body["message"], "Created");
        assert_eq!(body["response"], serde_json::json!([1, 2]));

        let body = serde_json::to_value(ApiResponse::message(StatusCode::OK, "Done")).unwrap();
        assert!(body.get("response").is_none());
    }

    #[test]
    fn test_status_carried_to_http() {
        let response = ApiResponse::with_status(StatusCode::MULTI_STATUS, "partial", Some(1)).into_response();
        assert_eq!(response.status(), StatusCode::MULTI_STATUS);
    }
}
