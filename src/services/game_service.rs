use std::collections::HashSet;

use time::OffsetDateTime;
use tracing::info;
use validator::Validate;

use crate::{
    dao::models::{GameDraft, GameVariant, ScoreBreakdown, ScoreDraft, ScoreShape, ScoreSheet},
    dto::{
        game::{
            GameCreatedResponse, GameForm, GamePayload, GameResponse, ScoreEntryInput,
            SubmitGameRequest,
        },
        validation::parse_submission_date,
    },
    error::ServiceError,
    state::SharedState,
};

/// List recorded games, newest first, optionally filtered to one variant.
pub async fn list_games(
    state: &SharedState,
    variant: Option<GameVariant>,
) -> Result<Vec<GameResponse>, ServiceError> {
    let games = state.store().list_games(variant).await?;
    Ok(games.into_iter().map(Into::into).collect())
}

/// Fetch a single game aggregate by id.
pub async fn get_game(state: &SharedState, id: i64) -> Result<GameResponse, ServiceError> {
    let Some(game) = state.store().find_game(id).await? else {
        return Err(ServiceError::NotFound(format!("game `{id}` not found")));
    };
    Ok(game.into())
}

/// Record a new game session for the given variant.
pub async fn create_game(
    state: &SharedState,
    variant: GameVariant,
    payload: GamePayload,
) -> Result<GameCreatedResponse, ServiceError> {
    let draft = decode_submission(variant, payload)?;
    let game_id = state.store().create_game(draft).await?;
    info!(game_id, %variant, "recorded new game");
    Ok(GameCreatedResponse { game_id })
}

/// Replace a game's date and entire score set.
pub async fn update_game(
    state: &SharedState,
    variant: GameVariant,
    id: i64,
    payload: GamePayload,
) -> Result<(), ServiceError> {
    let draft = decode_submission(variant, payload)?;
    if !state.store().update_game(id, draft).await? {
        return Err(ServiceError::NotFound(format!(
            "no {variant} game with id `{id}`"
        )));
    }
    info!(game_id = id, %variant, "replaced game");
    Ok(())
}

/// Delete a game together with its score rows.
pub async fn delete_game(
    state: &SharedState,
    variant: GameVariant,
    id: i64,
) -> Result<(), ServiceError> {
    if !state.store().delete_game(id, variant).await? {
        return Err(ServiceError::NotFound(format!(
            "no {variant} game with id `{id}`"
        )));
    }
    info!(game_id = id, %variant, "deleted game");
    Ok(())
}

/// Turn an inbound payload into a validated [`GameDraft`], rejecting anything
/// malformed before the store is touched.
fn decode_submission(variant: GameVariant, payload: GamePayload) -> Result<GameDraft, ServiceError> {
    match payload {
        GamePayload::Json(request) => decode_json(variant, request),
        GamePayload::Form(form) => decode_form(variant, form),
    }
}

fn decode_json(
    variant: GameVariant,
    request: SubmitGameRequest,
) -> Result<GameDraft, ServiceError> {
    request
        .validate()
        .map_err(|err| ServiceError::InvalidInput(format!("validation failed: {err}")))?;

    let played_on = decode_date(request.game_date.as_deref())?;
    let mut entries = Vec::with_capacity(request.scores.len());
    for entry in &request.scores {
        entries.push(decode_entry(variant, entry)?);
    }
    ensure_distinct_players(&entries)?;

    Ok(GameDraft {
        variant,
        played_on,
        entries,
    })
}

fn decode_entry(variant: GameVariant, entry: &ScoreEntryInput) -> Result<ScoreDraft, ServiceError> {
    let player_name = entry.player_name.trim();
    if player_name.is_empty() {
        return Err(ServiceError::InvalidInput(
            "player name must not be empty".into(),
        ));
    }

    let sheet = match variant.score_shape() {
        ScoreShape::Total => {
            if entry.has_component_fields() {
                return Err(ServiceError::InvalidInput(format!(
                    "`{variant}` records a single total; component fields are not accepted"
                )));
            }
            let total = entry.score.ok_or_else(|| {
                ServiceError::InvalidInput(format!("player `{player_name}` is missing a score"))
            })?;
            ScoreSheet::Total(total)
        }
        ScoreShape::Breakdown => {
            if entry.score.is_some() {
                return Err(ServiceError::InvalidInput(format!(
                    "`{variant}` records component fields; a bare `score` is not accepted"
                )));
            }
            ScoreSheet::Breakdown(ScoreBreakdown {
                legacy_score: entry.legacy_score,
                base_cards: entry.base_cards,
                extra_vp: entry.extra_vp,
                basic_events: entry.basic_events,
                special_events: entry.special_events,
                prosperity_cards: entry.prosperity_cards,
                visitors: entry.visitors,
                journey: entry.journey,
                garland_award: entry.garland_award,
            })
        }
    };

    Ok(ScoreDraft {
        player_name: player_name.to_owned(),
        sheet,
    })
}

fn decode_form(variant: GameVariant, form: GameForm) -> Result<GameDraft, ServiceError> {
    if variant.score_shape() != ScoreShape::Total {
        return Err(ServiceError::InvalidInput(format!(
            "`{variant}` submissions must be JSON; the form encoding carries single totals only"
        )));
    }

    let played_on = decode_date(form.date.as_deref())?;

    let names: Vec<&str> = form.player_names.split(',').map(str::trim).collect();
    if names.iter().any(|name| name.is_empty()) {
        return Err(ServiceError::InvalidInput(
            "player name must not be empty".into(),
        ));
    }

    let mut totals = Vec::new();
    for raw in form.player_scores.split(',') {
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        let total = raw
            .parse::<i64>()
            .map_err(|_| ServiceError::InvalidInput(format!("invalid score value `{raw}`")))?;
        totals.push(total);
    }

    // Never truncate or zero-pad a lopsided submission.
    if names.len() != totals.len() {
        return Err(ServiceError::InvalidInput(
            "mismatched number of players and scores".into(),
        ));
    }

    let entries: Vec<ScoreDraft> = names
        .into_iter()
        .zip(totals)
        .map(|(name, total)| ScoreDraft {
            player_name: name.to_owned(),
            sheet: ScoreSheet::Total(total),
        })
        .collect();
    ensure_distinct_players(&entries)?;

    Ok(GameDraft {
        variant,
        played_on,
        entries,
    })
}

fn decode_date(raw: Option<&str>) -> Result<OffsetDateTime, ServiceError> {
    match raw {
        Some(value) if !value.trim().is_empty() => parse_submission_date(value.trim())
            .map_err(|err| ServiceError::InvalidInput(err.to_string())),
        _ => Ok(OffsetDateTime::now_utc()),
    }
}

fn ensure_distinct_players(entries: &[ScoreDraft]) -> Result<(), ServiceError> {
    let mut seen = HashSet::new();
    for entry in entries {
        if !seen.insert(entry.player_name.as_str()) {
            return Err(ServiceError::InvalidInput(format!(
                "player `{}` appears more than once",
                entry.player_name
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn json_payload(body: &str) -> SubmitGameRequest {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn total_only_submission_decodes() {
        let request = json_payload(
            r#"{"game_date":"2024-01-01","scores":[
                {"player_name":"Alice","score":42},
                {"player_name":"Bob","score":37}
            ]}"#,
        );
        let draft = decode_json(GameVariant::Root, request).unwrap();

        assert_eq!(draft.variant, GameVariant::Root);
        assert_eq!(draft.played_on, datetime!(2024-01-01 00:00:00 UTC));
        assert_eq!(draft.entries.len(), 2);
        assert_eq!(draft.entries[0].sheet, ScoreSheet::Total(42));
    }

    #[test]
    fn total_only_requires_a_score() {
        let request = json_payload(r#"{"scores":[{"player_name":"Alice"}]}"#);
        let err = decode_json(GameVariant::Root, request).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[test]
    fn total_only_rejects_component_fields() {
        let request =
            json_payload(r#"{"scores":[{"player_name":"Alice","score":1,"base_cards":2}]}"#);
        let err = decode_json(GameVariant::Root, request).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[test]
    fn breakdown_rejects_bare_score() {
        let request = json_payload(r#"{"scores":[{"player_name":"Alice","score":42}]}"#);
        let err = decode_json(GameVariant::Everdell, request).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[test]
    fn breakdown_accepts_partial_components() {
        let request = json_payload(
            r#"{"scores":[{"player_name":"Alice","base_cards":10,"journey":3}]}"#,
        );
        let draft = decode_json(GameVariant::Everdell, request).unwrap();

        let ScoreSheet::Breakdown(sheet) = &draft.entries[0].sheet else {
            panic!("expected breakdown sheet");
        };
        assert_eq!(sheet.base_cards, Some(10));
        assert_eq!(sheet.journey, Some(3));
        assert_eq!(sheet.visitors, None);
    }

    #[test]
    fn empty_entry_list_is_rejected() {
        let request = json_payload(r#"{"scores":[]}"#);
        let err = decode_json(GameVariant::Root, request).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[test]
    fn duplicate_player_names_are_rejected() {
        let request = json_payload(
            r#"{"scores":[
                {"player_name":"Alice","score":1},
                {"player_name":"Alice","score":2}
            ]}"#,
        );
        let err = decode_json(GameVariant::Root, request).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[test]
    fn missing_date_defaults_to_now() {
        let request = json_payload(r#"{"scores":[{"player_name":"Alice","score":1}]}"#);
        let before = OffsetDateTime::now_utc();
        let draft = decode_json(GameVariant::Root, request).unwrap();
        assert!(draft.played_on >= before);
    }

    #[test]
    fn unparseable_date_is_rejected() {
        let request =
            json_payload(r#"{"game_date":"01/31/2024","scores":[{"player_name":"A","score":1}]}"#);
        let err = decode_json(GameVariant::Root, request).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[test]
    fn form_submission_decodes() {
        let form = GameForm {
            date: Some("2024-01-01".into()),
            player_names: "Alice, Bob".into(),
            player_scores: "42,37".into(),
        };
        let draft = decode_form(GameVariant::Root, form).unwrap();

        assert_eq!(draft.entries.len(), 2);
        assert_eq!(draft.entries[0].player_name, "Alice");
        assert_eq!(draft.entries[1].sheet, ScoreSheet::Total(37));
    }

    #[test]
    fn form_count_mismatch_is_rejected() {
        let form = GameForm {
            date: None,
            player_names: "Alice,Bob,Carol".into(),
            player_scores: "42,37".into(),
        };
        let err = decode_form(GameVariant::Root, form).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[test]
    fn form_rejects_non_numeric_scores() {
        let form = GameForm {
            date: None,
            player_names: "Alice".into(),
            player_scores: "forty-two".into(),
        };
        let err = decode_form(GameVariant::Root, form).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[test]
    fn form_is_rejected_for_breakdown_variants() {
        let form = GameForm {
            date: None,
            player_names: "Alice".into(),
            player_scores: "42".into(),
        };
        let err = decode_form(GameVariant::Everdell, form).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }
}
