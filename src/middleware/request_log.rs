use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;
use std::time::Instant;

use crate::state::AppState;
use crate::telemetry::RequestLogRecord;

/// Records the start time before any handler runs and hands exactly one
/// `RequestLogRecord` to the telemetry sink on completion. The catch-panic
/// layer sits inside this one, so the panic path is recorded too.
pub async fn request_log_middleware(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    let record = RequestLogRecord {
        method,
        path,
        status: response.status().as_u16(),
        duration_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        client_addr: connect_info.map(|ConnectInfo(addr)| addr.to_string()),
    };
    state.telemetry.record_request(&record).await;

    response
}
