//! Read-only bot endpoints

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::warn;

use super::MAX_ID_LENGTH;
use crate::errors::{AppError, AppResult};
use crate::models::{BotProfile, BotRecord};
use crate::web::{
    AppState,
    responses::{ErrorResponse, handle_error, ok},
};

#[derive(Debug, Serialize)]
pub struct UptimeResponse {
    pub bot: String,
    pub online_checks: i64,
    pub total_checks: i64,
    /// Fraction in `0..=1`, null before the first check
    pub percent: Option<f64>,
}

/// Resolves an id or vanity slug, treating over-long references as unknown
async fn resolve_bot(state: &AppState, reference: &str) -> AppResult<BotRecord> {
    if reference.len() > MAX_ID_LENGTH {
        return Err(AppError::not_found("Bot", reference));
    }

    state
        .bots
        .find_by_id_or_vanity(reference)
        .await?
        .ok_or_else(|| AppError::not_found("Bot", reference))
}

async fn bot_profile(state: &AppState, reference: &str) -> AppResult<BotProfile> {
    let bot = resolve_bot(state, reference).await?;
    state
        .bots
        .find_profile(&bot.id)
        .await?
        .ok_or_else(|| AppError::not_found("Bot", reference))
}

/// `GET /v1/bots`
pub async fn list_bots(State(state): State<AppState>) -> Response {
    match state.bots.list_profiles().await {
        Ok(profiles) => Json(profiles).into_response(),
        Err(e) => handle_error(e.into()),
    }
}

/// `GET /v1/bots/{id}`
pub async fn get_bot(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match bot_profile(&state, &id).await {
        Ok(profile) => ok(profile),
        Err(e) => handle_error(e),
    }
}

/// `GET /v1/bots/{id}/uptime`
pub async fn get_bot_uptime(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let bot = match resolve_bot(&state, &id).await {
        Ok(bot) => bot,
        Err(e) => return handle_error(e),
    };

    match state.bots.find_uptime(&bot.id).await {
        Ok(Some(uptime)) => ok(UptimeResponse {
            bot: bot.id,
            online_checks: uptime.online,
            total_checks: uptime.total,
            percent: uptime.ratio(),
        }),
        Ok(None) => {
            warn!(bot_id = %bot.id, "No uptime record for bot");
            ErrorResponse::unsuccessful(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to get uptime of the bot",
            )
            .into_response()
        }
        Err(e) => handle_error(e.into()),
    }
}
