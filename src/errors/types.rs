//! Error type definitions for the bot list API
//!
//! Errors are layered: repository, widget pipeline and webhook failures each
//! have their own enum and fold into [`AppError`] at the web boundary.

use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Repository layer errors
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Widget pipeline errors
    #[error("Widget error: {0}")]
    Widget(#[from] WidgetError),

    /// Test webhook errors
    #[error("Webhook error: {0}")]
    Webhook(#[from] WebhookError),

    /// Resource not found errors
    #[error("Not found: {resource} with id {id}")]
    NotFound { resource: String, id: String },
}

/// Repository layer specific errors
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Database errors from SeaORM
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

/// Test webhook errors. The messages of the rejection variants are sent to
/// the caller verbatim.
#[derive(Error, Debug)]
pub enum WebhookError {
    #[error("Missing url parameter")]
    MissingUrl,

    #[error("Webhook URL must start with http or https")]
    InvalidScheme,

    #[error("Webhook URL contains forbidden characters")]
    ForbiddenHost,

    /// The receiving endpoint was unreachable or answered with an error status
    #[error("{0}")]
    Delivery(String),
}

impl WebhookError {
    /// Whether the caller supplied a URL that was refused before sending
    pub fn is_rejection(&self) -> bool {
        !matches!(self, Self::Delivery(_))
    }
}

/// Widget pipeline specific errors
#[derive(Error, Debug)]
pub enum WidgetError {
    /// No bot matches the requested id or vanity slug
    #[error("Bot not found: {0}")]
    BotNotFound(String),

    /// The requested style is not registered
    #[error("Unknown widget style: {0}")]
    UnknownStyle(String),

    /// A font file could not be read or parsed
    #[error("Failed to load font {path}: {message}")]
    FontLoad { path: String, message: String },

    /// A static asset could not be read
    #[error("Failed to load asset {path}: {source}")]
    AssetLoad {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Avatar or other upstream download failed
    #[error("Upstream fetch failed for {url}: {message}")]
    UpstreamFetch { url: String, message: String },

    /// Template rendering failed
    #[error("Template rendering failed: {0}")]
    Render(#[from] askama::Error),

    /// SVG optimisation failed
    #[error("SVG optimisation failed: {message}")]
    Optimize { message: String },

    /// Data access failed while assembling a widget
    #[error("Data access failed: {0}")]
    Repository(#[from] RepositoryError),
}

impl AppError {
    /// Create a not found error
    pub fn not_found<R: Into<String>, I: Into<String>>(resource: R, id: I) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }
}

impl WidgetError {
    pub fn font_load<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::FontLoad {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn upstream_fetch<U: Into<String>, M: Into<String>>(url: U, message: M) -> Self {
        Self::UpstreamFetch {
            url: url.into(),
            message: message.into(),
        }
    }

    pub fn optimize<M: Into<String>>(message: M) -> Self {
        Self::Optimize {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widget_errors_keep_their_context() {
        let err: AppError = WidgetError::upstream_fetch("https://cdn", "timeout").into();
        assert!(matches!(err, AppError::Widget(WidgetError::UpstreamFetch { .. })));
        assert!(err.to_string().contains("timeout"));
    }

    #[test]
    fn test_helper_constructors() {
        let err = AppError::not_found("bot", "42");
        assert_eq!(err.to_string(), "Not found: bot with id 42");
    }

    #[test]
    fn test_webhook_rejections() {
        assert!(WebhookError::MissingUrl.is_rejection());
        assert!(WebhookError::ForbiddenHost.is_rejection());
        assert!(!WebhookError::Delivery("HTTP 500".into()).is_rejection());
        assert_eq!(
            WebhookError::InvalidScheme.to_string(),
            "Webhook URL must start with http or https"
        );
    }
}
