use anyhow::{Context, Result as AnyhowResult};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

const IN_MEMORY: &str = ":memory:";

/// Owns the SQLite pool backing the relational record store.
#[derive(Clone)]
pub struct DatabaseManager {
    db_path: PathBuf,
    pool: Pool<Sqlite>,
}

impl DatabaseManager {
    /// Open (creating if needed) the database at `db_path` and run migrations.
    ///
    /// The literal path `:memory:` opens a private in-memory database.
    pub async fn new(db_path: impl AsRef<Path>) -> AnyhowResult<Self> {
        if db_path.as_ref() == Path::new(IN_MEMORY) {
            return Self::open_in_memory().await;
        }

        let db_path = db_path.as_ref().to_path_buf();

        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create database directory: {}", parent.display())
                })?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(&db_path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to connect to database at: {}", db_path.display()))?;

        let manager = Self { db_path, pool };

        manager.optimize_for_performance().await?;
        manager.run_migrations().await?;

        info!("Database initialized at: {}", manager.db_path.display());
        Ok(manager)
    }

    /// Open a fresh in-memory database.
    ///
    /// Every pooled connection to `sqlite::memory:` would get its own empty
    /// database, so the pool is pinned to a single connection that never
    /// expires.
    pub async fn open_in_memory() -> AnyhowResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .context("Invalid in-memory connection string")?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(options)
            .await
            .context("Failed to create in-memory database")?;

        let manager = Self {
            db_path: PathBuf::from(IN_MEMORY),
            pool,
        };

        manager.run_migrations().await?;

        debug!("In-memory database initialized");
        Ok(manager)
    }

    async fn optimize_for_performance(&self) -> AnyhowResult<()> {
        // WAL keeps readers unblocked while an ingest is writing
        sqlx::query("PRAGMA journal_mode = WAL")
            .execute(&self.pool)
            .await
            .context("Failed to set WAL mode")?;

        // NORMAL is durable across application crashes in WAL mode
        sqlx::query("PRAGMA synchronous = NORMAL")
            .execute(&self.pool)
            .await
            .context("Failed to set synchronous mode")?;

        sqlx::query("PRAGMA temp_store = MEMORY")
            .execute(&self.pool)
            .await
            .context("Failed to set temp store")?;

        debug!("Database optimized for performance");
        Ok(())
    }

    async fn run_migrations(&self) -> AnyhowResult<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;

        debug!("Database migrations completed successfully");
        Ok(())
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn is_in_memory(&self) -> bool {
        self.db_path == Path::new(IN_MEMORY)
    }

    pub async fn close(self) -> AnyhowResult<()> {
        self.pool.close().await;
        Ok(())
    }

    pub async fn health_check(&self) -> AnyhowResult<()> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("Database health check failed")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_open_in_memory() {
        let manager = DatabaseManager::open_in_memory().await.unwrap();
        assert!(manager.is_in_memory());
        manager.health_check().await.unwrap();
    }

    #[tokio::test]
    async fn test_memory_path_alias() {
        let manager = DatabaseManager::new(":memory:").await.unwrap();
        assert!(manager.is_in_memory());
    }

    #[tokio::test]
    async fn test_migrations_create_table() {
        let manager = DatabaseManager::open_in_memory().await.unwrap();

        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master \
             WHERE type = 'table' AND name = 'knowledge_embeddings'",
        )
        .fetch_one(manager.pool())
        .await
        .unwrap();

        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_file_database_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("nested").join("store.db");

        let manager = DatabaseManager::new(&db_path).await.unwrap();
        manager.health_check().await.unwrap();

        assert!(db_path.exists());
        assert!(!manager.is_in_memory());
        manager.close().await.unwrap();
    }
}
