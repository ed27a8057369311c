use num_traits::ToPrimitive;
use serde::Serialize;
use std::collections::VecDeque;
use tokio::sync::RwLock;
use tracing::info;

const MAX_DURATION_SAMPLES: usize = 1000;

fn to_f64(value: u64) -> f64 {
    value.to_f64().unwrap_or(f64::MAX)
}

/// One record per inbound request, created by the request-logging middleware
/// and handed to the sink on response completion. Never stored.
#[derive(Debug, Clone)]
pub struct RequestLogRecord {
    pub method: String,
    pub path: String,
    pub status: u16,
    pub duration_ms: u64,
    pub client_addr: Option<String>,
}

#[derive(Clone, Default, Serialize)]
pub struct TelemetryStats {
    pub total_requests: u64,
    pub failed_requests: u64,
    pub success_rate: f64,
    pub avg_latency_ms: f64,
}

/// Observability sink handle. Constructed once at startup and injected via
/// `AppState`; the OTLP export pipeline behind the configured endpoint is an
/// external collaborator.
pub struct Telemetry {
    otlp_endpoint: String,
    total_requests: RwLock<u64>,
    failed_requests: RwLock<u64>,
    durations_ms: RwLock<VecDeque<u64>>,
}

impl Telemetry {
    #[must_use]
    pub fn new(otlp_endpoint: impl Into<String>) -> Self {
        Self {
            otlp_endpoint: otlp_endpoint.into(),
            total_requests: RwLock::new(0),
            failed_requests: RwLock::new(0),
            durations_ms: RwLock::new(VecDeque::new()),
        }
    }

    pub fn otlp_endpoint(&self) -> &str {
        &self.otlp_endpoint
    }

    /// Emits the structured request log line and updates the in-process
    /// counters. Safe for concurrent use from independent request tasks.
    pub async fn record_request(&self, record: &RequestLogRecord) {
        info!(
            target: "http_request",
            method = %record.method,
            path = %record.path,
            status = record.status,
            duration_ms = record.duration_ms,
            client = record.client_addr.as_deref().unwrap_or("-"),
            "HTTP request"
        );

        *self.total_requests.write().await += 1;
        if record.status >= 500 {
            *self.failed_requests.write().await += 1;
        }

        let mut durations = self.durations_ms.write().await;
        durations.push_back(record.duration_ms);
        if durations.len() > MAX_DURATION_SAMPLES {
            durations.pop_front();
        }
    }

    #[must_use]
    pub async fn stats(&self) -> TelemetryStats {
        let total_requests = *self.total_requests.read().await;
        let failed_requests = *self.failed_requests.read().await;
        let durations = self.durations_ms.read().await;

        let success_rate = if total_requests == 0 {
            0.0
        } else {
            to_f64(total_requests - failed_requests) / to_f64(total_requests) * 100.0
        };
        let avg_latency_ms = if durations.is_empty() {
            0.0
        } else {
            let sum: u64 = durations.iter().sum();
            to_f64(sum) / durations.len().to_f64().unwrap_or(f64::MAX)
        };

        TelemetryStats {
            total_requests,
            failed_requests,
            success_rate,
            avg_latency_ms,
        }
    }
}
