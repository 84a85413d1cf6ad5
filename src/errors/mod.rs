//! Centralized error handling for the bot list API
//!
//! # Error Categories
//!
//! - **Repository Errors**: data access layer failures
//! - **Widget Errors**: font, template, optimiser and avatar failures
//! - **Webhook Errors**: refused test webhook URLs and failed deliveries
//!
//! # Usage
//!
//! ```rust
//! use botlist_api::errors::{AppError, AppResult};
//!
//! async fn example_function() -> AppResult<String> {
//!     Ok("success".to_string())
//! }
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for Repository Results
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Convenience type alias for Widget Results
pub type WidgetResult<T> = Result<T, WidgetError>;
