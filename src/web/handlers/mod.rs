//! HTTP request handlers organised by resource

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::responses::ErrorResponse;

pub mod bots;
pub mod health;
pub mod statistics;
pub mod users;
pub mod webhooks;
pub mod widget;

/// Ids longer than this are rejected without touching the database
pub const MAX_ID_LENGTH: usize = 100;

/// Fallback for unknown paths under `/v1`
pub async fn endpoint_not_found() -> Response {
    ErrorResponse::unsuccessful(StatusCode::NOT_FOUND, "API endpoint not found").into_response()
}

/// Fallback for every other unknown path
pub async fn revision_not_found() -> Response {
    ErrorResponse::unsuccessful(StatusCode::NOT_FOUND, "API revision not found").into_response()
}
