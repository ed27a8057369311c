use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use edge_proxy::backend::BackendClient;
use edge_proxy::config::AppConfig;
use edge_proxy::handlers::{self, health, load_test, process, users};
use edge_proxy::middleware::catch_panic::panic_response;
use edge_proxy::middleware::request_log::request_log_middleware;
use edge_proxy::state::AppState;
use edge_proxy::telemetry::Telemetry;

fn setup_logging(config: &AppConfig) {
    let filter = EnvFilter::try_new(format!(
        "{level},tower_http=debug",
        level = config.log.level
    ))
    .unwrap_or_else(|_| EnvFilter::new(&config.log.level));

    match config.log.format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_target(false)
                        .with_file(true)
                        .with_line_number(true),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(true)
                        .with_file(true)
                        .with_line_number(true),
                )
                .init();
        }
    }
}

fn create_app_router(config: &AppConfig, state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::service_index))
        .route("/health", get(health::health_check))
        .route("/api/users", get(users::list_users))
        .route("/api/users/:id", get(users::get_user))
        .route("/api/process", post(process::process))
        .route("/api/load-test", get(load_test::load_test))
        .fallback(handlers::not_found)
        .layer(tower_http::limit::RequestBodyLimitLayer::new(
            config.server.max_request_size,
        ))
        .layer(tower_http::compression::CompressionLayer::new())
        // The panic layer sits inside the request logger so the 500 it
        // produces still lands in the request log.
        .layer(tower_http::catch_panic::CatchPanicLayer::custom(
            panic_response,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            request_log_middleware,
        ))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(stream) => Some(stream),
            Err(e) => {
                warn!("Failed to register SIGTERM handler: {e}");
                None
            }
        };

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, initiating graceful shutdown");
            }
            () = async {
                match sigterm {
                    Some(ref mut stream) => {
                        if stream.recv().await.is_none() {
                            warn!("SIGTERM signal stream closed unexpectedly");
                        }
                    }
                    None => std::future::pending().await,
                }
            } => {
                info!("Received SIGTERM, initiating graceful shutdown");
            }
        }
    }
    #[cfg(not(unix))]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {e}");
            return;
        }
        info!("Received Ctrl+C, initiating graceful shutdown");
    }
}

async fn run_server(app: Router, host: &str, port: u16) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid server address {host}:{port}: {e}"))?;

    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal());

    if let Err(e) = server.await {
        error!("Server error: {e}");
        return Err(anyhow::anyhow!("Server failed: {e}"));
    }

    info!("Server shutdown complete");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::new().map_err(|e| {
        anyhow::anyhow!(
            "Failed to load configuration: {e}. Please check your environment variables."
        )
    })?;

    setup_logging(&config);

    info!("Starting edge-proxy v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Config loaded: Host={}, Port={}, Backend={}",
        config.server.host, config.server.port, config.backend.base_url
    );

    let backend = Arc::new(BackendClient::new(
        &config.backend.base_url,
        config.backend.default_timeout_ms,
    )?);
    let telemetry = Arc::new(Telemetry::new(config.telemetry.otlp_endpoint.clone()));
    info!(
        endpoint = %telemetry.otlp_endpoint(),
        "Telemetry sink configured"
    );

    let state = AppState {
        config: Arc::new(config.clone()),
        backend,
        telemetry,
    };

    let app = create_app_router(&config, state);

    run_server(app, &config.server.host, config.server.port).await
}
