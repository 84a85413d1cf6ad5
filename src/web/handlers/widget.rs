//! Widget image handler

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::web::{AppState, responses::handle_error};

/// `GET /widget/{bot}/{style}`
///
/// Query pairs are kept in arrival order so repeated keys resolve the same
/// way the option parser resolves them.
pub async fn get_widget(
    State(state): State<AppState>,
    Path((bot, style)): Path<(String, String)>,
    Query(query): Query<Vec<(String, String)>>,
) -> Response {
    let pairs = query.iter().map(|(key, value)| (key.as_str(), value.as_str()));

    match state.widgets.render(&bot, &style, pairs).await {
        Ok(svg) => ([(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response(),
        Err(e) => handle_error(e.into()),
    }
}
