//! SeaORM repositories
//!
//! Each repository holds a shared connection and converts between entity
//! models and the domain types in [`crate::models`].

pub mod bot;
pub mod user;

pub use bot::BotSeaOrmRepository;
pub use user::UserSeaOrmRepository;
