use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use negobot_api::{routes, AppState, Config};

const DEFAULT_LOG_FILTER: &str = "negobot_api=debug,tower_http=debug";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    info!("Starting NegoBot API server");

    let (config, loaded_from) = Config::load()?;
    if loaded_from.is_none() {
        info!("No configuration file found, using defaults");
    }

    let addr = config.server.bind_address();
    let app_state = AppState::new(config)?;
    let app = routes::app(app_state);

    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
