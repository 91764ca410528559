/// APOD relay: proxies NASA's Astronomy Picture of the Day and pushes
/// every fresh result to connected viewers
mod clients;
mod config;
mod domain;
mod errors;
mod facts;
mod handlers;
mod relay;
mod routes;
mod services;
mod utils;

use crate::clients::ApodClient;
use crate::config::AppConfig;
use crate::facts::SPACE_FACTS;
use crate::handlers::AppState;
use crate::relay::Relay;
use crate::routes::build_router;
use crate::services::ApodService;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    // Load configuration
    let config = AppConfig::from_env()?;
    info!("Configuration loaded successfully");

    let client = ApodClient::new(
        config.nasa_api_url.clone(),
        config.nasa_api_key.clone(),
        config.upstream_timeout,
    )?;
    info!("Upstream APOD endpoint: {}", client.base_url());

    let relay = Arc::new(Relay::new());
    let apod_service = Arc::new(ApodService::new(client, relay.clone(), SPACE_FACTS));

    let state = AppState {
        apod_service,
        relay,
        public_dir: Arc::new(config.public_dir.clone()),
    };

    let app = build_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("NASA Space Explorer server running on http://{}", addr);
    info!("WebSocket server ready for real-time updates");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server closed");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down gracefully");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                info!("Received SIGTERM, shutting down gracefully");
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
