//! Server module
//!
//! Hosts the poll store behind the HTTP API.

pub mod http;

use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;

use crate::config::ServerConfig;
use crate::polls::PollStore;

/// Server errors
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Invalid bind address '{addr}': {source}")]
    InvalidAddress {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Resolve the socket address from config
pub fn bind_address(config: &ServerConfig) -> Result<SocketAddr, ServerError> {
    let addr = format!("{}:{}", config.bind, config.port);
    addr.parse::<SocketAddr>()
        .map_err(|source| ServerError::InvalidAddress { addr, source })
}

/// Run the HTTP server until Ctrl-C
pub async fn serve(config: &ServerConfig, store: Arc<PollStore>) -> Result<(), ServerError> {
    let addr = bind_address(config)?;
    let app = http::create_router(store);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(address = %addr, "Starting poll server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Poll server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::warn!("Shutdown requested, stopping gracefully...");
}
