use config::{Config, ConfigError};
use serde::Deserialize;
use std::env;
use validator::Validate;

const DEFAULT_MAX_REQUEST_SIZE: usize = 10 * 1024 * 1024;
const DEFAULT_BACKEND_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_BACKEND_URL: &str = "http://backend.default.svc.cluster.local:8080";
const DEFAULT_OTLP_ENDPOINT: &str = "otel-collector.observability.svc.cluster.local:4317";

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct ServerConfig {
    #[validate(length(min = 1))]
    pub host: String,
    #[validate(range(min = 1, max = 65535))]
    pub port: u16,
    #[serde(default = "default_max_request_size")]
    pub max_request_size: usize,
}

fn default_max_request_size() -> usize {
    DEFAULT_MAX_REQUEST_SIZE
}

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct BackendConfig {
    #[validate(length(min = 1))]
    pub base_url: String,
    #[validate(range(min = 1))]
    pub default_timeout_ms: u64,
}

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct LogConfig {
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_format() -> String {
    "json".to_string()
}

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct TelemetryConfig {
    #[validate(length(min = 1))]
    pub otlp_endpoint: String,
}

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct AppConfig {
    #[validate(nested)]
    pub server: ServerConfig,
    #[validate(nested)]
    pub backend: BackendConfig,
    #[validate(nested)]
    pub log: LogConfig,
    #[validate(nested)]
    pub telemetry: TelemetryConfig,
}

fn parse_port(value: &str) -> Result<i64, ConfigError> {
    value.parse::<i64>().map_err(|e| {
        ConfigError::Message(format!(
            "Invalid port value '{}': {}. Port must be a number between 1 and 65535.",
            value, e
        ))
    })
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let s = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("server.max_request_size", DEFAULT_MAX_REQUEST_SIZE as i64)?
            .set_default("backend.base_url", DEFAULT_BACKEND_URL)?
            .set_default("backend.default_timeout_ms", DEFAULT_BACKEND_TIMEOUT_MS)?
            .set_default("log.level", "info")?
            .set_default("log.format", "json")?
            .set_default("telemetry.otlp_endpoint", DEFAULT_OTLP_ENDPOINT)?
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            // Deployment manifests use the short env names; they win over
            // the APP__* hierarchy.
            .set_override_option(
                "server.port",
                env::var("PORT")
                    .ok()
                    .map(|v| parse_port(&v))
                    .transpose()?,
            )?
            .set_override_option("backend.base_url", env::var("BACKEND_URL").ok())?
            .set_override_option(
                "telemetry.otlp_endpoint",
                env::var("OTEL_EXPORTER_OTLP_ENDPOINT").ok(),
            )?
            .build()?;

        let config: AppConfig = s.try_deserialize()?;

        if let Err(e) = config.validate() {
            return Err(ConfigError::Message(format!("Validation error: {}", e)));
        }

        Ok(config)
    }
}
