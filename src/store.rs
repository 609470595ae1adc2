//! Relational storage for drink records

use crate::drink::{Drink, DrinkFields};
use async_trait::async_trait;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Storage failures
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

// ============================================================================
// Trait Definitions
// ============================================================================

/// Persistence operations for drinks
///
/// Absence is not an error: lookups return `None` and deletes return `false`
/// when no record has the given id.
#[async_trait]
pub trait DrinkRepository: Send + Sync {
    /// All records, ascending by id
    async fn list(&self) -> Result<Vec<Drink>, StoreError>;

    async fn get(&self, id: i64) -> Result<Option<Drink>, StoreError>;

    /// Insert a new record and return it with its assigned id
    async fn insert(&self, fields: DrinkFields) -> Result<Drink, StoreError>;

    /// Overwrite every writable field of an existing record
    async fn replace(&self, id: i64, fields: DrinkFields) -> Result<Option<Drink>, StoreError>;

    /// Remove a record, returning whether it existed
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;

    /// Round trip to the store without touching records
    async fn ping(&self) -> Result<(), StoreError>;
}

// ============================================================================
// Production Implementation
// ============================================================================

/// SQLite-backed repository
#[derive(Clone)]
pub struct SqliteDrinkStore {
    pool: SqlitePool,
}

impl SqliteDrinkStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to `database_url` and apply pending migrations
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = connect(database_url, max_connections).await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl DrinkRepository for SqliteDrinkStore {
    async fn list(&self) -> Result<Vec<Drink>, StoreError> {
        let drinks =
            sqlx::query_as::<_, Drink>("SELECT id, name, description FROM drinks ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        Ok(drinks)
    }

    async fn get(&self, id: i64) -> Result<Option<Drink>, StoreError> {
        let drink =
            sqlx::query_as::<_, Drink>("SELECT id, name, description FROM drinks WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(drink)
    }

    async fn insert(&self, fields: DrinkFields) -> Result<Drink, StoreError> {
        let drink = sqlx::query_as::<_, Drink>(
            "INSERT INTO drinks (name, description) VALUES (?, ?) \
             RETURNING id, name, description",
        )
        .bind(fields.name)
        .bind(fields.description)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(drink_id = drink.id, "Drink inserted");

        Ok(drink)
    }

    async fn replace(&self, id: i64, fields: DrinkFields) -> Result<Option<Drink>, StoreError> {
        let drink = sqlx::query_as::<_, Drink>(
            "UPDATE drinks SET name = ?, description = ? WHERE id = ? \
             RETURNING id, name, description",
        )
        .bind(fields.name)
        .bind(fields.description)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(drink)
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM drinks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Open a connection pool and run migrations
///
/// In-memory databases exist per connection, so they get a single connection
/// that is never closed for idleness or age.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, StoreError> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    let pool_options = if is_in_memory(database_url) {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
    } else {
        SqlitePoolOptions::new().max_connections(max_connections)
    };

    let pool = pool_options.connect_with(options).await?;
    MIGRATOR.run(&pool).await?;

    tracing::info!(database_url = %database_url, "Database ready");

    Ok(pool)
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

/// Insert `seeds` if the store holds no drinks yet
///
/// Returns how many records were inserted.
pub async fn seed(repo: &dyn DrinkRepository, seeds: &[DrinkFields]) -> Result<usize, StoreError> {
    if seeds.is_empty() {
        return Ok(0);
    }

    if !repo.list().await?.is_empty() {
        tracing::info!("Store already populated, skipping seed drinks");
        return Ok(0);
    }

    for fields in seeds {
        repo.insert(fields.clone()).await?;
    }

    tracing::info!(count = seeds.len(), "Seeded drinks");

    Ok(seeds.len())
}
