//! SeaORM entity definitions

pub mod prelude;

pub mod bots;
pub mod libraries;
pub mod tags;
pub mod uptime;
pub mod users;
