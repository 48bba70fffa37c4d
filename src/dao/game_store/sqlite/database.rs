//! SQLite connection pool construction and schema bootstrap.

use std::path::Path;
use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};

use super::error::{Result, SqliteDaoError};

/// Holds a connection pool to the SQLite database.
///
/// Opening the database also applies the embedded schema migrations; the
/// process must not serve requests against a missing or partial schema, so
/// callers treat any error from [`Database::open`] as fatal.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (or create) the database at `path`, apply the schema, and return
    /// a ready-to-use handle.
    pub async fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|source| SqliteDaoError::CreateDir { source })?;
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))
            .map_err(|source| SqliteDaoError::Connect { source })?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|source| SqliteDaoError::Connect { source })?;

        let db = Self { pool };
        db.run_migrations().await?;
        Ok(db)
    }

    /// In-memory database for tests. The pool is capped at one connection so
    /// every query sees the same memory instance.
    #[cfg(test)]
    pub async fn new_in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|source| SqliteDaoError::Connect { source })?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|source| SqliteDaoError::Connect { source })?;

        let db = Self { pool };
        db.run_migrations().await?;
        Ok(db)
    }

    /// Apply the embedded migrations from `migrations/`. Idempotent.
    async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|source| SqliteDaoError::Migrate { source })?;
        Ok(())
    }

    /// Reference to the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
