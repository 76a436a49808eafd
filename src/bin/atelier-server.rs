//! HTTP server exposing the action dispatcher.
//!
//! Environment:
//! - `API_KEY` / `GEMINI_API_KEY`: provider credential
//! - `GEMINI_BASE_URL`: provider base URL override
//! - `ATELIER_BIND_ADDR`, `ATELIER_ROUTE`: listen address and route
//! - `ATELIER_LOG_LEVEL`, `ATELIER_LOG_FORMAT`, `ATELIER_LOG_FILE`: logging

use std::sync::Arc;

use atelier::config::ServerConfig;
use atelier::dispatcher::Dispatcher;
use atelier::server_adapters::axum::router;
use atelier::telemetry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _guard = telemetry::init_from_env()?;

    let config = ServerConfig::from_env()?;
    let dispatcher = Arc::new(Dispatcher::from_env()?);
    let app = router(dispatcher, &config.route);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, route = %config.route, "atelier server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await?;

    Ok(())
}
