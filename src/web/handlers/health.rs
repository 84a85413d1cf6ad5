//! Health check HTTP handler

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use crate::database::Database;
use crate::web::{AppState, responses::Success};
use crate::widget::WidgetStats;

#[derive(Debug, Serialize)]
pub struct DatabaseHealth {
    pub status: &'static str,
    pub backend: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: DateTime<Utc>,
    pub database: DatabaseHealth,
    pub widgets: WidgetStats,
}

/// `GET /health`
///
/// 200 while the database answers, 503 otherwise. Widget cache counters are
/// reported either way.
pub async fn health_check(State(state): State<AppState>) -> Response {
    let database = check_database_health(&state.database).await;
    let healthy = database.status == "connected";

    let body = Success {
        success: healthy,
        data: HealthResponse {
            status: if healthy { "healthy" } else { "unhealthy" },
            version: env!("CARGO_PKG_VERSION"),
            timestamp: Utc::now(),
            database,
            widgets: state.widgets.stats().await,
        },
    };

    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(body)).into_response()
}

async fn check_database_health(database: &Database) -> DatabaseHealth {
    let status = match database.ping().await {
        Ok(()) => "connected",
        Err(e) => {
            warn!(error = %e, "Database health check failed");
            "disconnected"
        }
    };

    DatabaseHealth {
        status,
        backend: database.database_type().as_str(),
    }
}
