//! Read-only user endpoints

use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use super::MAX_ID_LENGTH;
use crate::errors::{AppError, AppResult};
use crate::models::{BotProfile, UserSummary};
use crate::web::{
    AppState,
    responses::{handle_error, ok},
};

async fn resolve_user(state: &AppState, id: &str) -> AppResult<UserSummary> {
    if id.len() > MAX_ID_LENGTH {
        return Err(AppError::not_found("User", id));
    }

    state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("User", id))
}

async fn owned_bots(state: &AppState, id: &str) -> AppResult<Vec<BotProfile>> {
    let user = resolve_user(state, id).await?;
    Ok(state.bots.profiles_by_owner(&user.id).await?)
}

/// `GET /v1/users/{id}`
pub async fn get_user(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match resolve_user(&state, &id).await {
        Ok(user) => ok(user),
        Err(e) => handle_error(e),
    }
}

/// `GET /v1/users/{id}/bots`
pub async fn get_user_bots(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match owned_bots(&state, &id).await {
        Ok(profiles) => Json(profiles).into_response(),
        Err(e) => handle_error(e),
    }
}
