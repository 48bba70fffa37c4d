use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;

/// Supported game variants, fixed at compile time.
///
/// The variant decides which score shape a session carries and scopes
/// update/delete operations so a caller cannot retarget a session of a
/// different game through the wrong route tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum GameVariant {
    /// Component-breakdown score sheets.
    Everdell,
    /// Single-total score sheets.
    Root,
}

/// Which score shape a variant records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreShape {
    /// One required integer total per player.
    Total,
    /// A fixed set of independently-nullable components per player.
    Breakdown,
}

impl GameVariant {
    /// Discriminator tag stored in the `games.game_type` column.
    pub fn as_str(self) -> &'static str {
        match self {
            GameVariant::Everdell => "everdell",
            GameVariant::Root => "root",
        }
    }

    /// Resolve a stored discriminator tag back to a variant.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "everdell" => Some(GameVariant::Everdell),
            "root" => Some(GameVariant::Root),
            _ => None,
        }
    }

    /// Score shape recorded by this variant.
    pub fn score_shape(self) -> ScoreShape {
        match self {
            GameVariant::Everdell => ScoreShape::Breakdown,
            GameVariant::Root => ScoreShape::Total,
        }
    }
}

impl std::fmt::Display for GameVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-player result for one game session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreSheet {
    /// Single required total.
    Total(i64),
    /// Named components; `None` means the player did not use that mechanic,
    /// which is distinct from scoring zero in it.
    Breakdown(ScoreBreakdown),
}

/// Component breakdown recorded for breakdown variants.
///
/// `legacy_score` holds the single total of rows recorded before the
/// breakdown columns existed; it stays nullable like every other component.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreBreakdown {
    pub legacy_score: Option<i64>,
    pub base_cards: Option<i64>,
    pub extra_vp: Option<i64>,
    pub basic_events: Option<i64>,
    pub special_events: Option<i64>,
    pub prosperity_cards: Option<i64>,
    pub visitors: Option<i64>,
    pub journey: Option<i64>,
    pub garland_award: Option<i64>,
}

/// One player's stored result, name-joined back to the players table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreEntity {
    /// Canonical player name.
    pub player_name: String,
    /// The result itself, shaped by the owning game's variant.
    pub sheet: ScoreSheet,
}

/// Fully materialized game aggregate returned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameEntity {
    /// Store-assigned identifier; never changes for the lifetime of the row.
    pub id: i64,
    /// Variant discriminator.
    pub variant: GameVariant,
    /// When the session was played.
    pub played_on: OffsetDateTime,
    /// Per-player results; ordering carries no meaning.
    pub scores: Vec<ScoreEntity>,
}

/// Validated submission handed to the store for create and full-replace
/// update operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameDraft {
    pub variant: GameVariant,
    pub played_on: OffsetDateTime,
    pub entries: Vec<ScoreDraft>,
}

/// One player/score pair inside a [`GameDraft`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreDraft {
    pub player_name: String,
    pub sheet: ScoreSheet,
}
