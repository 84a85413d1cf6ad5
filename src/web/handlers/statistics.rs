use axum::{extract::State, response::Response};

use crate::web::{
    AppState,
    responses::{handle_error, ok},
};

/// `GET /v1/statistics`
pub async fn get_statistics(State(state): State<AppState>) -> Response {
    match state.bots.statistics().await {
        Ok(statistics) => ok(statistics),
        Err(e) => handle_error(e.into()),
    }
}
