//! SQLite-backed game store.
//!
//! [`Database`] wraps a `sqlx::SqlitePool` configured with WAL mode and
//! enforced foreign keys; `sqlx::migrate!` applies the idempotent schema from
//! `migrations/` when the pool is opened. [`SqliteGameStore`] implements
//! [`crate::dao::game_store::GameStore`] on top of the pool, bracketing every
//! multi-statement operation in a single transaction.

mod database;
mod error;
mod helpers;
mod store;

pub use database::Database;
pub use error::SqliteDaoError;
pub use store::SqliteGameStore;
