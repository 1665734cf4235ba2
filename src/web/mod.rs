//! Web layer module
//!
//! HTTP interface of the token lookup service. Handlers are thin and
//! delegate to [`TokenLookupService`]; [`responses`] owns the status code,
//! cache and CORS header contract.
//!
//! # Routes
//!
//! - `GET /info/{identifier}` and `GET /api/{identifier}/info`: token metadata
//! - `GET /image/{*path}` and `GET /api/image/{*path}`: token logo bytes
//! - `OPTIONS` on all of the above: CORS preflight
//! - `GET /lists`, `GET /list?url=`: registry overview and single list
//! - `GET /health`: liveness plus cache statistics

use anyhow::Result;
use axum::{routing::get, Router};
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{config::Config, services::TokenLookupService};

pub mod handlers;
pub mod responses;

/// Web server configuration and setup
pub struct WebServer {
    app: Router,
    addr: SocketAddr,
}

impl WebServer {
    pub fn new(config: Config, lookup: TokenLookupService) -> Result<Self> {
        let addr: SocketAddr = format!("{}:{}", config.web.host, config.web.port).parse()?;
        let app = create_router(AppState { config, lookup });

        Ok(Self { app, addr })
    }

    /// Start the web server, stopping on Ctrl-C
    pub async fn serve(self) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(&self.addr).await?;
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }

    /// Get the host address
    pub fn host(&self) -> String {
        self.addr.ip().to_string()
    }

    /// Get the port number
    pub fn port(&self) -> u16 {
        self.addr.port()
    }
}

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub lookup: TokenLookupService,
}

/// Create the router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    use handlers::{health, lists, preflight, token_image, token_info};

    Router::new()
        .route("/health", get(health::health_check))
        .route("/lists", get(lists::list_overview))
        .route("/list", get(lists::list_view))
        // Token metadata
        .route(
            "/info/",
            get(token_info::missing_token_info).options(preflight),
        )
        .route(
            "/info/{identifier}",
            get(token_info::get_token_info).options(preflight),
        )
        .route(
            "/api/{identifier}/info",
            get(token_info::get_token_info).options(preflight),
        )
        // Token logos
        .route(
            "/image/",
            get(token_image::missing_token_image).options(preflight),
        )
        .route(
            "/image/{*path}",
            get(token_image::get_token_image).options(preflight),
        )
        .route(
            "/api/image/",
            get(token_image::missing_token_image).options(preflight),
        )
        .route(
            "/api/image/{*path}",
            get(token_image::get_token_image).options(preflight),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, stopping web server");
}
