//! Small helpers shared across the crate

pub mod short_number;

pub use short_number::short_number;
