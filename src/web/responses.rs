//! HTTP response types and error mapping
//!
//! Success bodies are flattened next to `success: true`; error bodies carry
//! the numeric status as `code` alongside a human readable `message`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::{error, warn};

use crate::errors::{AppError, WebhookError, WidgetError};

pub const INTERNAL_ERROR_MESSAGE: &str =
    "An internal server error occurred. Please try again later.";

/// Error body returned by every route
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    pub code: u16,
    pub message: String,
    /// Underlying failure, only sent for failed webhook deliveries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip)]
    status: StatusCode,
}

impl ErrorResponse {
    /// `{code, message}`
    pub fn new<M: Into<String>>(status: StatusCode, message: M) -> Self {
        Self {
            success: None,
            code: status.as_u16(),
            message: message.into(),
            error: None,
            status,
        }
    }

    /// `{success: false, code, message}`
    pub fn unsuccessful<M: Into<String>>(status: StatusCode, message: M) -> Self {
        Self {
            success: Some(false),
            ..Self::new(status, message)
        }
    }

    pub fn with_error<E: Into<String>>(self, error: E) -> Self {
        Self {
            error: Some(error.into()),
            ..self
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// Success wrapper: `{"success": true, ...data}`
#[derive(Debug, Clone, Serialize)]
pub struct Success<T> {
    pub success: bool,
    #[serde(flatten)]
    pub data: T,
}

/// Success response helper
pub fn ok<T: Serialize>(data: T) -> Response {
    (
        StatusCode::OK,
        Json(Success {
            success: true,
            data,
        }),
    )
        .into_response()
}

/// Convert AppError to appropriate HTTP response
pub fn handle_error(error: AppError) -> Response {
    let response = match &error {
        AppError::NotFound { resource, .. } => {
            ErrorResponse::new(StatusCode::NOT_FOUND, format!("{resource} does not exist"))
        }
        AppError::Widget(WidgetError::BotNotFound(_)) => {
            ErrorResponse::new(StatusCode::NOT_FOUND, "Bot not found")
        }
        AppError::Widget(WidgetError::UnknownStyle(_)) => {
            ErrorResponse::new(StatusCode::NOT_FOUND, "Unknown widget style")
        }
        AppError::Webhook(WebhookError::Delivery(message)) => {
            warn!(error = %message, "Test webhook failed to send");
            ErrorResponse::unsuccessful(StatusCode::SERVICE_UNAVAILABLE, "Webhook failed to send")
                .with_error(message.clone())
        }
        AppError::Webhook(rejected) => {
            ErrorResponse::unsuccessful(StatusCode::BAD_REQUEST, rejected.to_string())
        }
        _ => {
            error!(error = %error, "Request failed");
            ErrorResponse::unsuccessful(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
        }
    };

    response.into_response()
}
