//! Drinks API
//!
//! A small REST service that stores drinks in SQLite and exposes them over
//! HTTP with create, read, replace and delete operations.

pub mod api;
pub mod config;
pub mod drink;
pub mod error;
pub mod metrics;
pub mod serializer;
pub mod store;

pub use config::ServerConfig;
pub use drink::{Drink, DrinkFields};
pub use error::{ApiError, ApiResult};
pub use serializer::ValidationErrors;
pub use store::{DrinkRepository, SqliteDrinkStore, StoreError};
