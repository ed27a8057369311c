use axum::{
    body::Body,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::backend::CallOutcome;

pub mod health;
pub mod process;
pub mod users;

/// Service description served at `/`.
pub async fn service_index() -> impl IntoResponse {
    Json(json!({
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "message": "Welcome to Observability Stack Demo",
        "endpoints": {
            "health": "/health",
            "users": "/api/users",
            "user": "/api/users/:id",
            "process": "/api/process",
            "load_test": "/api/load-test"
        }
    }))
}

/// Catch-all for routes outside the table above.
pub async fn not_found(uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Not Found", "path": uri.path() })),
    )
}

/// Uniform outcome mapping for the proxy routes: pass the backend response
/// through on success; map a backend 404 to `not_found_error` when the route
/// is a single-resource lookup; everything else becomes a 500 carrying the
/// failure text.
pub(crate) fn outcome_response(
    outcome: CallOutcome,
    operation_error: &str,
    not_found_error: Option<&str>,
) -> Response {
    match outcome {
        Ok(backend_response) => Response::builder()
            .status(backend_response.status)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(backend_response.body))
            .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response()),
        Err(failure) => {
            if failure.backend_status() == Some(StatusCode::NOT_FOUND) {
                if let Some(message) = not_found_error {
                    return (StatusCode::NOT_FOUND, Json(json!({ "error": message })))
                        .into_response();
                }
            }

            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": operation_error, "message": failure.to_string() })),
            )
                .into_response()
        }
    }
}
