//! Services that sit between the web handlers and outside systems

pub mod webhook;

pub use webhook::{WebhookClient, WebhookTarget};
