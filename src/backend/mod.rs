use anyhow::{Context, Result};
use axum::body::Bytes;
use reqwest::{header, Client, Method, StatusCode};
use std::time::Duration;

/// Classified result of one backend call. A non-2xx response is a *received*
/// response and stays distinct from a transport failure.
pub type CallOutcome = std::result::Result<BackendResponse, CallFailure>;

#[derive(Debug, Clone)]
pub struct BackendResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

#[derive(Debug, thiserror::Error)]
pub enum CallFailure {
    #[error("timeout")]
    Timeout,
    #[error("{0}")]
    Transport(String),
    #[error("backend returned HTTP {status}")]
    Backend { status: StatusCode, body: Bytes },
}

impl CallFailure {
    pub fn backend_status(&self) -> Option<StatusCode> {
        match self {
            Self::Backend { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Request body forwarded to the backend untouched. The edge never inspects
/// payload contents, so the bytes and content type travel as-is.
#[derive(Debug, Clone)]
pub struct ForwardedBody {
    pub content_type: String,
    pub bytes: Bytes,
}

impl ForwardedBody {
    pub fn json(bytes: impl Into<Bytes>) -> Self {
        Self {
            content_type: "application/json".to_string(),
            bytes: bytes.into(),
        }
    }
}

pub struct BackendClient {
    client: Client,
    base_url: String,
    default_timeout: Duration,
}

impl BackendClient {
    pub fn new(base_url: &str, default_timeout_ms: u64) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to create backend HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            default_timeout: Duration::from_millis(default_timeout_ms),
        })
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Issues one HTTP call with a per-call timeout. Never returns an
    /// unclassified error; logging is the caller's responsibility.
    pub async fn call(
        &self,
        method: Method,
        path: &str,
        body: Option<ForwardedBody>,
        timeout: Duration,
    ) -> CallOutcome {
        let url = format!("{}{}", self.base_url, path);

        let mut request = self.client.request(method, &url).timeout(timeout);
        if let Some(forwarded) = body {
            request = request
                .header(header::CONTENT_TYPE, forwarded.content_type)
                .body(forwarded.bytes);
        }

        let response = request.send().await.map_err(classify)?;
        let status = response.status();
        let body = response.bytes().await.map_err(classify)?;

        if status.is_success() {
            Ok(BackendResponse { status, body })
        } else {
            Err(CallFailure::Backend { status, body })
        }
    }
}

fn classify(err: reqwest::Error) -> CallFailure {
    if err.is_timeout() {
        CallFailure::Timeout
    } else {
        CallFailure::Transport(err.to_string())
    }
}
