use axum::response::{IntoResponse, Response};
use axum::{http::StatusCode, Json};
use serde_json::json;
use std::any::Any;
use tracing::error;

/// Terminal error handler for `tower_http::catch_panic::CatchPanicLayer`.
/// Last resort only: handlers map backend failures themselves, so this fires
/// for genuine bugs. Clients get JSON, never a stack trace.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unhandled internal error".to_string()
    };

    error!(error = %message, "Unhandled panic in request handler");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal Server Error", "message": message })),
    )
        .into_response()
}
