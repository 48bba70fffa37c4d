//! Shared encode/decode helpers for timestamp and score columns.

use time::OffsetDateTime;
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;

use super::error::{Result, SqliteDaoError};
use crate::dao::models::{GameVariant, ScoreBreakdown, ScoreEntity, ScoreShape, ScoreSheet};

/// Stored format of rows written before the switch to RFC 3339: a timestamp
/// with optional fractional seconds and a zone offset, e.g.
/// `2023-11-04 19:22:10.591373+00:00`.
const LEGACY_TIMESTAMP_FORMAT: &'static [BorrowedFormatItem<'static>] = format_description!(
    version = 2,
    "[year]-[month]-[day] [hour]:[minute]:[second][optional [.[subsecond]]][offset_hour sign:mandatory]:[offset_minute]"
);

/// Format a timestamp for the `games.game_date` column.
pub(crate) fn encode_timestamp(ts: OffsetDateTime) -> Result<String> {
    ts.format(&Rfc3339)
        .map_err(|source| SqliteDaoError::FormatTimestamp { source })
}

/// Parse a stored `game_date` value: RFC 3339 first (what we write), then the
/// legacy format. Both failing is a data-integrity error, not a default.
pub(crate) fn decode_timestamp(game_id: i64, raw: &str) -> Result<OffsetDateTime> {
    OffsetDateTime::parse(raw, &Rfc3339)
        .or_else(|_| OffsetDateTime::parse(raw, LEGACY_TIMESTAMP_FORMAT))
        .map_err(|_| SqliteDaoError::BadTimestamp {
            id: game_id,
            value: raw.to_owned(),
        })
}

/// One score row as selected from the store, name-joined to players:
/// `(name, score, legacy_score, base_cards, extra_vp, basic_events,
/// special_events, prosperity_cards, visitors, journey, garland_award)`.
pub(crate) type ScoreRow = (
    String,
    Option<i64>,
    Option<i64>,
    Option<i64>,
    Option<i64>,
    Option<i64>,
    Option<i64>,
    Option<i64>,
    Option<i64>,
    Option<i64>,
    Option<i64>,
);

/// Column values bound when inserting a score row, in the same order as
/// [`ScoreRow`] minus the player name.
pub(crate) fn sheet_columns(sheet: &ScoreSheet) -> [Option<i64>; 10] {
    match sheet {
        ScoreSheet::Total(total) => {
            let mut columns = [None; 10];
            columns[0] = Some(*total);
            columns
        }
        ScoreSheet::Breakdown(b) => [
            None,
            b.legacy_score,
            b.base_cards,
            b.extra_vp,
            b.basic_events,
            b.special_events,
            b.prosperity_cards,
            b.visitors,
            b.journey,
            b.garland_award,
        ],
    }
}

/// Decode a stored score row into the shape the owning game's variant
/// prescribes. NULL components stay `None`.
pub(crate) fn decode_score_row(
    variant: GameVariant,
    game_id: i64,
    row: ScoreRow,
) -> Result<ScoreEntity> {
    let (
        player_name,
        score,
        legacy_score,
        base_cards,
        extra_vp,
        basic_events,
        special_events,
        prosperity_cards,
        visitors,
        journey,
        garland_award,
    ) = row;

    let sheet = match variant.score_shape() {
        ScoreShape::Total => {
            let total = score.ok_or_else(|| SqliteDaoError::MissingTotal {
                game_id,
                player: player_name.clone(),
            })?;
            ScoreSheet::Total(total)
        }
        ScoreShape::Breakdown => ScoreSheet::Breakdown(ScoreBreakdown {
            legacy_score,
            base_cards,
            extra_vp,
            basic_events,
            special_events,
            prosperity_cards,
            visitors,
            journey,
            garland_award,
        }),
    };

    Ok(ScoreEntity { player_name, sheet })
}
