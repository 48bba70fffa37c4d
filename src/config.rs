//! Environment-driven runtime configuration.

use std::{env, path::PathBuf};

/// Port used when neither `PORT` nor `SERVER_PORT` is set.
const DEFAULT_PORT: u16 = 9797;
/// Default on-disk location of the SQLite database.
const DEFAULT_DATABASE_PATH: &str = "data/tally.db";
/// Environment variable that overrides [`DEFAULT_DATABASE_PATH`].
const DATABASE_PATH_ENV: &str = "TALLY_BACK_DB";

#[derive(Debug, Clone)]
/// Immutable runtime configuration resolved once at startup.
pub struct AppConfig {
    /// TCP port the HTTP server binds to.
    pub port: u16,
    /// Location of the SQLite database file.
    pub database_path: PathBuf,
}

impl AppConfig {
    /// Resolve the configuration from the environment, falling back to the
    /// baked-in defaults.
    pub fn load() -> Self {
        let port = env::var("PORT")
            .or_else(|_| env::var("SERVER_PORT"))
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let database_path = env::var_os(DATABASE_PATH_ENV)
            .map(PathBuf::from)
            .filter(|path| !path.as_os_str().is_empty())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH));

        Self {
            port,
            database_path,
        }
    }
}
