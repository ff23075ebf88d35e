/// Database connection and schema bootstrap
use crate::error::{Result, StorageError};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

/// SQLite database handle for Vireo client state
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create a new database connection and run migrations
    ///
    /// # Errors
    /// Returns an error if the connection fails or migrations fail
    pub async fn new(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        Self::run_migrations(&pool).await?;

        Ok(Self { pool })
    }

    /// Create database from an existing pool (for testing)
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create an in-memory database (for testing)
    ///
    /// Restricted to a single connection so every query sees the same
    /// in-memory schema.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        Self::run_migrations(&pool).await?;

        Ok(Self { pool })
    }

    /// Get a reference to the underlying pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run database migrations
    ///
    /// Migrations are embedded for reliability across execution
    /// contexts and are idempotent.
    async fn run_migrations(pool: &SqlitePool) -> Result<()> {
        const MIGRATIONS: &[&str] = &[
            include_str!("../migrations/20250601000001_create_track_preferences.sql"),
            include_str!("../migrations/20250601000002_create_watch_state.sql"),
        ];

        for migration in MIGRATIONS {
            sqlx::query(migration)
                .execute(pool)
                .await
                .map_err(|e| StorageError::Migration(e.to_string()))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let db = Database::in_memory().await.expect("database");
        Database::run_migrations(db.pool())
            .await
            .expect("second run succeeds");
    }
}
