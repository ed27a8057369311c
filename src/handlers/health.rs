use axum::{response::IntoResponse, Json};
use serde_json::json;

/// Liveness probe. Never touches the backend; readiness is a separate
/// concern this service does not expose.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
