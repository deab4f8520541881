//! Axum server setup: CORS for the local frontends, request tracing,
//! graceful shutdown on Ctrl+C / SIGTERM.

use std::net::SocketAddr;

use axum::{
    http::{HeaderValue, Method},
    Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::handlers::{router, AppState};

/// Origins of the local development frontends.
pub const DEFAULT_ORIGINS: [&str; 4] = [
    "http://localhost:4200",
    "http://127.0.0.1:4200",
    "http://localhost:3000",
    "http://127.0.0.1:3000",
];

#[derive(Debug, Error)]
pub enum ServeError {
    #[error("invalid CORS origin {0:?}")]
    InvalidOrigin(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            allowed_origins: DEFAULT_ORIGINS.iter().map(|o| o.to_string()).collect(),
        }
    }
}

impl ServerConfig {
    fn cors(&self) -> Result<CorsLayer, ServeError> {
        let origins = self
            .allowed_origins
            .iter()
            .map(|o| HeaderValue::from_str(o).map_err(|_| ServeError::InvalidOrigin(o.clone())))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CorsLayer::new()
            .allow_origin(origins)
            .allow_credentials(true)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers(AllowHeaders::mirror_request()))
    }
}

/// The full application: routes plus CORS and tracing middleware.
pub fn app(state: AppState, config: &ServerConfig) -> Result<Router, ServeError> {
    Ok(router(state)
        .layer(config.cors()?)
        .layer(TraceLayer::new_for_http()))
}

/// Bind and serve until a shutdown signal arrives.
pub async fn serve(config: ServerConfig, state: AppState) -> Result<(), ServeError> {
    let app = app(state, &config)?;

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, starting shutdown"),
        _ = terminate => info!("Received SIGTERM, starting shutdown"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_listens_on_8000() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 8000);
        assert_eq!(config.allowed_origins.len(), 4);
    }

    #[test]
    fn origin_with_newline_is_rejected() {
        let config = ServerConfig {
            allowed_origins: vec!["http://bad\norigin".into()],
            ..ServerConfig::default()
        };
        assert!(matches!(config.cors(), Err(ServeError::InvalidOrigin(_))));
    }
}
