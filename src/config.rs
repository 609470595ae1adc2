//! Configuration structures and loading logic

use crate::drink::DrinkFields;
use crate::serializer;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub api_port: u16,
    pub database_url: String,
    pub max_connections: u32,

    /// Inserted at startup when the store is empty
    pub drinks: Vec<DrinkFields>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_port: default_api_port(),
            database_url: default_database_url(),
            max_connections: default_max_connections(),
            drinks: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from file with environment variable overrides
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let mut config = if let Some(path) = path {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content).context("Failed to parse TOML config")?
        } else {
            Self::default()
        };

        // Environment variable overrides
        if let Ok(port) = std::env::var("DRINKS_API_PORT") {
            config.api_port = port.parse().context("Invalid DRINKS_API_PORT value")?;
        }
        if let Ok(url) = std::env::var("DRINKS_DATABASE_URL") {
            config.database_url = url;
        }
        if let Ok(max) = std::env::var("DRINKS_MAX_CONNECTIONS") {
            config.max_connections = max
                .parse()
                .context("Invalid DRINKS_MAX_CONNECTIONS value")?;
        }

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_port < 1024 {
            anyhow::bail!("API port must be >= 1024 (got {})", self.api_port);
        }

        if self.database_url.trim().is_empty() {
            anyhow::bail!("Database URL cannot be empty");
        }
        if !self.database_url.starts_with("sqlite:") {
            anyhow::bail!(
                "Database URL must use the sqlite: scheme (got '{}')",
                self.database_url
            );
        }

        if self.max_connections == 0 {
            anyhow::bail!("max_connections must be at least 1");
        }

        self.normalized_seeds()?;

        Ok(())
    }

    /// Seed drinks as the serializer would store them, trimmed and checked
    pub fn normalized_seeds(&self) -> Result<Vec<DrinkFields>> {
        self.drinks
            .iter()
            .enumerate()
            .map(|(index, drink)| {
                serializer::validate(drink).map_err(|errors| {
                    anyhow::anyhow!("Seed drink #{} is invalid: {}", index + 1, errors)
                })
            })
            .collect()
    }
}

// Default functions
fn default_api_port() -> u16 {
    8000
}
fn default_database_url() -> String {
    "sqlite://drinks.db".to_string()
}
fn default_max_connections() -> u32 {
    5
}
