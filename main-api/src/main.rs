use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use main_api::http::proxy::ProxyTarget;
use main_api::http::{create_router, AppState};
use main_api::observability::HttpMetrics;
use main_api_core::downstream::DownstreamClient;
use main_api_core::registry::{ServiceKind, ServiceRegistry};
use main_api_core::{logging, Config};

/// API gateway in front of the auth and image services
#[derive(Debug, Parser)]
#[command(name = "main-api", version)]
struct Cli {
    /// Path to a YAML configuration file
    #[arg(long, env = "MAINAPI_CONFIG_PATH")]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration (defaults -> file -> environment)
    let config = Config::load(cli.config.as_deref())?;

    // Initialize logging
    logging::init_logging(&config.logging)?;

    // Resolve downstream endpoints; a malformed base URL is fatal here,
    // before the listener binds.
    let registry = Arc::new(ServiceRegistry::from_config(&config.services)?);
    info!(
        "auth service: {}",
        registry.resolve(ServiceKind::Auth).base_url
    );
    info!(
        "image service: {}",
        registry.resolve(ServiceKind::Image).base_url
    );

    let metrics = HttpMetrics::new()?;
    let downstream = DownstreamClient::new()?;

    let auth_proxy = Arc::new(ProxyTarget::auth_validate(
        registry.resolve(ServiceKind::Auth),
    )?);
    let image_proxy = Arc::new(ProxyTarget::image_upload(
        registry.resolve(ServiceKind::Image),
    )?);

    let state = AppState {
        registry,
        downstream,
        metrics,
        auth_proxy,
        image_proxy,
    };
    let router = create_router(state);

    let address = config.http_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("main-api running on port {}", config.server.port);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("main-api stopped");
    Ok(())
}

/// Resolve when ctrl-c or SIGTERM arrives.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}
