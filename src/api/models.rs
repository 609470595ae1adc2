//! API request and response models

use crate::drink::Drink;
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Collection listing
#[derive(Debug, Serialize, Deserialize)]
pub struct DrinkListResponse {
    pub drinks: Vec<Drink>,
}
