use thiserror::Error;

use crate::dao::storage::StorageError;

/// Result alias local to the SQLite backend.
pub type Result<T> = std::result::Result<T, SqliteDaoError>;

/// Error raised by the SQLite game store.
#[derive(Debug, Error)]
pub enum SqliteDaoError {
    #[error("failed to create database directory")]
    CreateDir {
        #[source]
        source: std::io::Error,
    },
    #[error("failed to open database connection")]
    Connect {
        #[source]
        source: sqlx::Error,
    },
    #[error("failed to apply schema migrations")]
    Migrate {
        #[source]
        source: sqlx::migrate::MigrateError,
    },
    #[error("failed to begin transaction")]
    Begin {
        #[source]
        source: sqlx::Error,
    },
    #[error("failed to commit transaction")]
    Commit {
        #[source]
        source: sqlx::Error,
    },
    #[error("failed to insert game row")]
    InsertGame {
        #[source]
        source: sqlx::Error,
    },
    #[error("failed to look up player `{name}`")]
    ResolvePlayer {
        name: String,
        #[source]
        source: sqlx::Error,
    },
    #[error("failed to insert player `{name}`")]
    InsertPlayer {
        name: String,
        #[source]
        source: sqlx::Error,
    },
    #[error("failed to insert score row for `{player}`")]
    InsertScore {
        player: String,
        #[source]
        source: sqlx::Error,
    },
    #[error("failed to list games")]
    ListGames {
        #[source]
        source: sqlx::Error,
    },
    #[error("failed to load game `{id}`")]
    LoadGame {
        id: i64,
        #[source]
        source: sqlx::Error,
    },
    #[error("failed to load scores for game `{game_id}`")]
    LoadScores {
        game_id: i64,
        #[source]
        source: sqlx::Error,
    },
    #[error("failed to update game `{id}`")]
    UpdateGame {
        id: i64,
        #[source]
        source: sqlx::Error,
    },
    #[error("failed to delete scores for game `{game_id}`")]
    DeleteScores {
        game_id: i64,
        #[source]
        source: sqlx::Error,
    },
    #[error("failed to delete game `{id}`")]
    DeleteGame {
        id: i64,
        #[source]
        source: sqlx::Error,
    },
    #[error("health ping failed")]
    HealthPing {
        #[source]
        source: sqlx::Error,
    },
    #[error("failed to format timestamp for storage")]
    FormatTimestamp {
        #[source]
        source: time::error::Format,
    },
    #[error("game `{id}` carries unknown variant tag `{tag}`")]
    UnknownVariant { id: i64, tag: String },
    #[error("game `{id}` carries unparseable timestamp `{value}`")]
    BadTimestamp { id: i64, value: String },
    #[error("total-only game `{game_id}` has no stored total for `{player}`")]
    MissingTotal { game_id: i64, player: String },
}

impl From<SqliteDaoError> for StorageError {
    fn from(err: SqliteDaoError) -> Self {
        match err {
            SqliteDaoError::UnknownVariant { .. }
            | SqliteDaoError::BadTimestamp { .. }
            | SqliteDaoError::MissingTotal { .. } => StorageError::corrupted(err.to_string()),
            other => StorageError::unavailable(other.to_string(), other),
        }
    }
}
