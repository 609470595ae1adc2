//! HTTP surface: routing, handlers and wire models

pub mod handlers;
pub mod models;
pub mod routes;

pub use routes::{AppState, create_router};
