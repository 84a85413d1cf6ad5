//! Bot directory API with dynamically rendered SVG widgets

pub mod config;
pub mod database;
pub mod entities;
pub mod errors;
pub mod models;
pub mod services;
pub mod utils;
pub mod web;
pub mod widget;
