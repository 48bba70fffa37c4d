pub mod sqlite;

use crate::dao::models::{GameDraft, GameEntity, GameVariant};
use crate::dao::storage::StorageResult;
use futures::future::BoxFuture;

/// Abstraction over the persistence layer for game sessions.
///
/// All multi-statement operations run inside exactly one transaction on the
/// backend; no error path leaves a transaction open past the call boundary.
pub trait GameStore: Send + Sync {
    /// Persist a new game with its score entries; returns the assigned id.
    fn create_game(&self, draft: GameDraft) -> BoxFuture<'static, StorageResult<i64>>;
    /// All games, newest date first, each fully populated with its scores.
    fn list_games(
        &self,
        variant: Option<GameVariant>,
    ) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>>;
    /// Single game aggregate; `None` when the id is unknown.
    fn find_game(&self, id: i64) -> BoxFuture<'static, StorageResult<Option<GameEntity>>>;
    /// Replace a game's date and entire score set. `false` means the id does
    /// not exist for the draft's variant and nothing was changed.
    fn update_game(&self, id: i64, draft: GameDraft) -> BoxFuture<'static, StorageResult<bool>>;
    /// Remove a game and all of its score rows. `false` means the id does not
    /// exist for the given variant and nothing was changed.
    fn delete_game(
        &self,
        id: i64,
        variant: GameVariant,
    ) -> BoxFuture<'static, StorageResult<bool>>;
    /// Cheap connectivity probe used by the health endpoint.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
}
