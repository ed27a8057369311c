use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap},
    response::Response,
};
use reqwest::Method;
use std::time::Duration;
use tracing::{error, info};

use crate::backend::ForwardedBody;
use crate::handlers::outcome_response;
use crate::state::AppState;

// Processing is expected to be slower than the lookup routes.
const PROCESS_TIMEOUT: Duration = Duration::from_secs(10);

/// Forwards the inbound body to the backend untouched, content type and all.
pub async fn process(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    info!("Processing request");

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("application/json")
        .to_string();

    let outcome = state
        .backend
        .call(
            Method::POST,
            "/api/process",
            Some(ForwardedBody {
                content_type,
                bytes: body,
            }),
            PROCESS_TIMEOUT,
        )
        .await;
    if let Err(failure) = &outcome {
        error!(error = %failure, "Error processing request");
    }

    outcome_response(outcome, "Processing failed", None)
}
