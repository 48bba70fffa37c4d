use futures::future::BoxFuture;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::debug;

use super::error::{Result, SqliteDaoError};
use super::helpers::{ScoreRow, decode_score_row, decode_timestamp, encode_timestamp, sheet_columns};
use crate::dao::game_store::GameStore;
use crate::dao::models::{GameDraft, GameEntity, GameVariant, ScoreDraft, ScoreEntity};
use crate::dao::storage::StorageResult;

/// SQLite implementation of [`GameStore`].
///
/// Every write operation runs inside one transaction whose first statement is
/// itself a write, so SQLite serializes concurrent writers and readers never
/// observe a partially-written aggregate.
#[derive(Clone)]
pub struct SqliteGameStore {
    pool: SqlitePool,
}

impl SqliteGameStore {
    /// Wrap an open pool (see [`super::Database`]).
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl GameStore for SqliteGameStore {
    fn create_game(&self, draft: GameDraft) -> BoxFuture<'static, StorageResult<i64>> {
        let pool = self.pool.clone();
        Box::pin(async move { Ok(create_game(&pool, draft).await?) })
    }

    fn list_games(
        &self,
        variant: Option<GameVariant>,
    ) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>> {
        let pool = self.pool.clone();
        Box::pin(async move { Ok(list_games(&pool, variant).await?) })
    }

    fn find_game(&self, id: i64) -> BoxFuture<'static, StorageResult<Option<GameEntity>>> {
        let pool = self.pool.clone();
        Box::pin(async move { Ok(find_game(&pool, id).await?) })
    }

    fn update_game(&self, id: i64, draft: GameDraft) -> BoxFuture<'static, StorageResult<bool>> {
        let pool = self.pool.clone();
        Box::pin(async move { Ok(update_game(&pool, id, draft).await?) })
    }

    fn delete_game(
        &self,
        id: i64,
        variant: GameVariant,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        let pool = self.pool.clone();
        Box::pin(async move { Ok(delete_game(&pool, id, variant).await?) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let pool = self.pool.clone();
        Box::pin(async move {
            sqlx::query("SELECT 1")
                .execute(&pool)
                .await
                .map_err(|source| SqliteDaoError::HealthPing { source })?;
            Ok(())
        })
    }
}

async fn create_game(pool: &SqlitePool, draft: GameDraft) -> Result<i64> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|source| SqliteDaoError::Begin { source })?;

    let game_id = sqlx::query("INSERT INTO games (game_type, game_date) VALUES (?, ?)")
        .bind(draft.variant.as_str())
        .bind(encode_timestamp(draft.played_on)?)
        .execute(&mut *tx)
        .await
        .map_err(|source| SqliteDaoError::InsertGame { source })?
        .last_insert_rowid();

    for entry in &draft.entries {
        let player_id = resolve_player(&mut tx, &entry.player_name).await?;
        insert_score(&mut tx, game_id, player_id, entry).await?;
    }

    tx.commit()
        .await
        .map_err(|source| SqliteDaoError::Commit { source })?;

    debug!(game_id, variant = %draft.variant, entries = draft.entries.len(), "game created");
    Ok(game_id)
}

/// Resolve a player name to its canonical row id, creating the row on first
/// sight. Losing an insert race against a concurrent writer is recovered by
/// re-reading the now-existing row; any other failure aborts the operation.
async fn resolve_player(tx: &mut Transaction<'_, Sqlite>, name: &str) -> Result<i64> {
    let existing: Option<(i64,)> = sqlx::query_as("SELECT id FROM players WHERE name = ?")
        .bind(name)
        .fetch_optional(&mut **tx)
        .await
        .map_err(|source| SqliteDaoError::ResolvePlayer {
            name: name.to_owned(),
            source,
        })?;
    if let Some((id,)) = existing {
        return Ok(id);
    }

    debug!(player = name, "player not found, creating new row");
    match sqlx::query("INSERT INTO players (name) VALUES (?)")
        .bind(name)
        .execute(&mut **tx)
        .await
    {
        Ok(result) => Ok(result.last_insert_rowid()),
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            let (id,): (i64,) = sqlx::query_as("SELECT id FROM players WHERE name = ?")
                .bind(name)
                .fetch_one(&mut **tx)
                .await
                .map_err(|source| SqliteDaoError::ResolvePlayer {
                    name: name.to_owned(),
                    source,
                })?;
            Ok(id)
        }
        Err(source) => Err(SqliteDaoError::InsertPlayer {
            name: name.to_owned(),
            source,
        }),
    }
}

async fn insert_score(
    tx: &mut Transaction<'_, Sqlite>,
    game_id: i64,
    player_id: i64,
    entry: &ScoreDraft,
) -> Result<()> {
    let mut query = sqlx::query(
        "INSERT INTO scores (game_id, player_id, score, legacy_score, base_cards, extra_vp, \
         basic_events, special_events, prosperity_cards, visitors, journey, garland_award) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(game_id)
    .bind(player_id);
    for value in sheet_columns(&entry.sheet) {
        query = query.bind(value);
    }
    query
        .execute(&mut **tx)
        .await
        .map_err(|source| SqliteDaoError::InsertScore {
            player: entry.player_name.clone(),
            source,
        })?;
    Ok(())
}

async fn list_games(pool: &SqlitePool, variant: Option<GameVariant>) -> Result<Vec<GameEntity>> {
    let rows: Vec<(i64, String, String)> = match variant {
        Some(v) => {
            sqlx::query_as(
                "SELECT id, game_type, game_date FROM games \
                 WHERE game_type = ? ORDER BY game_date DESC",
            )
            .bind(v.as_str())
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as("SELECT id, game_type, game_date FROM games ORDER BY game_date DESC")
                .fetch_all(pool)
                .await
        }
    }
    .map_err(|source| SqliteDaoError::ListGames { source })?;

    // One query per game on top of the listing query; fine at this scale and
    // it keeps every returned aggregate fully materialized.
    let mut games = Vec::with_capacity(rows.len());
    for (id, tag, raw_date) in rows {
        games.push(hydrate_game(pool, id, &tag, &raw_date).await?);
    }
    Ok(games)
}

async fn find_game(pool: &SqlitePool, id: i64) -> Result<Option<GameEntity>> {
    let row: Option<(i64, String, String)> =
        sqlx::query_as("SELECT id, game_type, game_date FROM games WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|source| SqliteDaoError::LoadGame { id, source })?;

    match row {
        Some((id, tag, raw_date)) => Ok(Some(hydrate_game(pool, id, &tag, &raw_date).await?)),
        None => Ok(None),
    }
}

async fn hydrate_game(pool: &SqlitePool, id: i64, tag: &str, raw_date: &str) -> Result<GameEntity> {
    let variant = GameVariant::from_tag(tag).ok_or_else(|| SqliteDaoError::UnknownVariant {
        id,
        tag: tag.to_owned(),
    })?;
    let played_on = decode_timestamp(id, raw_date)?;
    let scores = fetch_scores(pool, id, variant).await?;
    Ok(GameEntity {
        id,
        variant,
        played_on,
        scores,
    })
}

async fn fetch_scores(
    pool: &SqlitePool,
    game_id: i64,
    variant: GameVariant,
) -> Result<Vec<ScoreEntity>> {
    let rows: Vec<ScoreRow> = sqlx::query_as(
        "SELECT p.name, s.score, s.legacy_score, s.base_cards, s.extra_vp, s.basic_events, \
         s.special_events, s.prosperity_cards, s.visitors, s.journey, s.garland_award \
         FROM scores s JOIN players p ON s.player_id = p.id WHERE s.game_id = ?",
    )
    .bind(game_id)
    .fetch_all(pool)
    .await
    .map_err(|source| SqliteDaoError::LoadScores { game_id, source })?;

    rows.into_iter()
        .map(|row| decode_score_row(variant, game_id, row))
        .collect()
}

async fn update_game(pool: &SqlitePool, id: i64, draft: GameDraft) -> Result<bool> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|source| SqliteDaoError::Begin { source })?;

    let affected = sqlx::query("UPDATE games SET game_date = ? WHERE id = ? AND game_type = ?")
        .bind(encode_timestamp(draft.played_on)?)
        .bind(id)
        .bind(draft.variant.as_str())
        .execute(&mut *tx)
        .await
        .map_err(|source| SqliteDaoError::UpdateGame { id, source })?
        .rows_affected();
    if affected == 0 {
        // Unknown id or variant mismatch; the dropped transaction rolls back.
        return Ok(false);
    }

    sqlx::query("DELETE FROM scores WHERE game_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|source| SqliteDaoError::DeleteScores { game_id: id, source })?;

    for entry in &draft.entries {
        let player_id = resolve_player(&mut tx, &entry.player_name).await?;
        insert_score(&mut tx, id, player_id, entry).await?;
    }

    tx.commit()
        .await
        .map_err(|source| SqliteDaoError::Commit { source })?;

    debug!(game_id = id, entries = draft.entries.len(), "game replaced");
    Ok(true)
}

async fn delete_game(pool: &SqlitePool, id: i64, variant: GameVariant) -> Result<bool> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|source| SqliteDaoError::Begin { source })?;

    sqlx::query("DELETE FROM scores WHERE game_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|source| SqliteDaoError::DeleteScores { game_id: id, source })?;

    let affected = sqlx::query("DELETE FROM games WHERE id = ? AND game_type = ?")
        .bind(id)
        .bind(variant.as_str())
        .execute(&mut *tx)
        .await
        .map_err(|source| SqliteDaoError::DeleteGame { id, source })?
        .rows_affected();
    if affected == 0 {
        // Score rows may already be gone inside this transaction; dropping it
        // rolls that back so a miss leaves the store untouched.
        return Ok(false);
    }

    tx.commit()
        .await
        .map_err(|source| SqliteDaoError::Commit { source })?;

    debug!(game_id = id, variant = %variant, "game deleted");
    Ok(true)
}
