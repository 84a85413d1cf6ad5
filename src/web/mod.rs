//! Web layer module
//!
//! Routes:
//! - `GET /widget/{bot}/{style}`: rendered SVG card
//! - `GET /v1/...`: read-only bot, user and statistics endpoints
//! - `POST /v1/internal/test-webhook`: sample upvote sent to a caller's URL
//! - `GET /health`: database connectivity and widget cache counters
//!
//! Unknown `/v1` paths and every other unknown path get distinct 404 bodies.

use anyhow::Result;
use axum::{
    Router,
    routing::{get, post},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::config::WebConfig;
use crate::database::Database;
use crate::database::repositories::{BotSeaOrmRepository, UserSeaOrmRepository};
use crate::services::WebhookClient;
use crate::widget::WidgetService;

pub mod handlers;
pub mod responses;

pub use responses::{ErrorResponse, handle_error};

/// Shared handler state; every field is a cheap clone
#[derive(Clone)]
pub struct AppState {
    pub database: Database,
    pub bots: BotSeaOrmRepository,
    pub users: UserSeaOrmRepository,
    pub widgets: Arc<WidgetService>,
    pub webhooks: WebhookClient,
}

impl AppState {
    pub fn new(database: Database, widgets: Arc<WidgetService>, webhooks: WebhookClient) -> Self {
        let connection = database.connection();
        Self {
            bots: BotSeaOrmRepository::new(connection.clone()),
            users: UserSeaOrmRepository::new(connection),
            database,
            widgets,
            webhooks,
        }
    }
}

/// Web server configuration and setup
pub struct WebServer {
    app: Router,
    addr: SocketAddr,
}

impl WebServer {
    pub fn new(config: &WebConfig, state: AppState) -> Result<Self> {
        let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

        Ok(Self {
            app: create_router(state),
            addr,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Serve until SIGINT or SIGTERM
    pub async fn serve(self) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(&self.addr).await?;
        info!("Web server listening on {}", self.addr);

        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Web server stopped");
        Ok(())
    }
}

/// Create the router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/widget/{bot}/{style}", get(handlers::widget::get_widget))
        .nest("/v1", v1_routes())
        .fallback(handlers::revision_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn v1_routes() -> Router<AppState> {
    Router::new()
        .route("/statistics", get(handlers::statistics::get_statistics))
        .route("/bots", get(handlers::bots::list_bots))
        .route("/bots/{id}", get(handlers::bots::get_bot))
        .route("/bots/{id}/uptime", get(handlers::bots::get_bot_uptime))
        .route("/users/{id}", get(handlers::users::get_user))
        .route("/users/{id}/bots", get(handlers::users::get_user_bots))
        .route(
            "/internal/test-webhook",
            post(handlers::webhooks::test_webhook),
        )
        .fallback(handlers::endpoint_not_found)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT (Ctrl+C), shutting down gracefully"),
        _ = terminate => info!("Received SIGTERM, shutting down gracefully"),
    }
}
