use crate::backend::BackendClient;
use crate::config::AppConfig;
use crate::telemetry::Telemetry;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub backend: Arc<BackendClient>,
    pub telemetry: Arc<Telemetry>,
}
