// ABOUTME: Liveness endpoint for load balancers and uptime checks
// ABOUTME: Reports service name, version and current time

use axum::Json;
use serde_json::{json, Value};

pub const SERVICE_NAME: &str = "pcbuilder-api";

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
