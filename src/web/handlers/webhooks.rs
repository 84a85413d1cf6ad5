//! Test webhook endpoint

use axum::{
    extract::{Query, State},
    response::Response,
};
use serde::{Deserialize, Serialize};

use crate::web::{
    AppState,
    responses::{handle_error, ok},
};

#[derive(Debug, Default, Deserialize)]
pub struct TestWebhookQuery {
    pub url: Option<String>,
    /// Bot the sample upvote is for
    pub id: Option<String>,
}

#[derive(Debug, Serialize)]
struct WebhookSent {
    code: u16,
    message: &'static str,
}

/// `POST /v1/internal/test-webhook?url=...&id=...`
pub async fn test_webhook(
    State(state): State<AppState>,
    Query(query): Query<TestWebhookQuery>,
) -> Response {
    match state
        .webhooks
        .send_test(query.url.as_deref(), query.id.as_deref())
        .await
    {
        Ok(_) => ok(WebhookSent {
            code: 200,
            message: "Webhook was successfully sent",
        }),
        Err(e) => handle_error(e.into()),
    }
}
