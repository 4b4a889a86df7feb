//! TCP listener binding.
//!
//! # Responsibilities
//! - Parse the configured bind address
//! - Bind the TCP listener
//! - Surface bind failures (address in use, permission denied) with the address

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::ListenerConfig;

/// Error type for listener operations.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// The configured address does not parse.
    #[error("Invalid bind address: {0}")]
    InvalidAddress(String),
    /// Failed to bind to address.
    #[error("Failed to bind {0}: {1}")]
    Bind(SocketAddr, #[source] std::io::Error),
}

/// Bind to the configured address.
pub async fn bind(config: &ListenerConfig) -> Result<TcpListener, ListenerError> {
    let addr: SocketAddr = config
        .bind_address
        .parse()
        .map_err(|_| ListenerError::InvalidAddress(config.bind_address.clone()))?;

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| ListenerError::Bind(addr, e))?;

    let local_addr = listener.local_addr().map_err(|e| ListenerError::Bind(addr, e))?;
    tracing::info!(address = %local_addr, "Listener bound");

    Ok(listener)
}
