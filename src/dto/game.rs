use axum::{
    Form, Json,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    dao::models::{GameEntity, GameVariant, ScoreEntity, ScoreSheet},
    dto::format_timestamp,
    error::AppError,
};

/// JSON payload used to submit a game session, for both create and
/// full-replace update.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct SubmitGameRequest {
    /// Session date in `YYYY-MM-DD`; defaults to today when omitted.
    #[serde(default)]
    pub game_date: Option<String>,
    /// One entry per participating player.
    #[validate(length(min = 1, message = "a game requires at least one score entry"))]
    pub scores: Vec<ScoreEntryInput>,
}

/// One player's submitted result. Which fields are accepted depends on the
/// variant the request targets: total-only variants require `score`,
/// breakdown variants take any subset of the component fields.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ScoreEntryInput {
    /// Player display name; resolved to a canonical player row by the store.
    pub player_name: String,
    /// Single total for total-only variants.
    #[serde(default)]
    pub score: Option<i64>,
    #[serde(default)]
    pub legacy_score: Option<i64>,
    #[serde(default)]
    pub base_cards: Option<i64>,
    #[serde(default)]
    pub extra_vp: Option<i64>,
    #[serde(default)]
    pub basic_events: Option<i64>,
    #[serde(default)]
    pub special_events: Option<i64>,
    #[serde(default)]
    pub prosperity_cards: Option<i64>,
    #[serde(default)]
    pub visitors: Option<i64>,
    #[serde(default)]
    pub journey: Option<i64>,
    #[serde(default)]
    pub garland_award: Option<i64>,
}

impl ScoreEntryInput {
    /// Whether any breakdown component field was supplied.
    pub fn has_component_fields(&self) -> bool {
        self.legacy_score.is_some()
            || self.base_cards.is_some()
            || self.extra_vp.is_some()
            || self.basic_events.is_some()
            || self.special_events.is_some()
            || self.prosperity_cards.is_some()
            || self.visitors.is_some()
            || self.journey.is_some()
            || self.garland_award.is_some()
    }
}

/// Urlencoded fallback shape submitted by the form frontend: a date plus two
/// comma-separated lists that must line up one-to-one.
#[derive(Debug, Deserialize, ToSchema)]
pub struct GameForm {
    /// Session date in `YYYY-MM-DD`; defaults to today when omitted.
    #[serde(default)]
    pub date: Option<String>,
    /// Comma-separated player names.
    #[serde(rename = "playerNames")]
    pub player_names: String,
    /// Comma-separated integer totals, same length as `playerNames`.
    #[serde(rename = "playerScores")]
    pub player_scores: String,
}

/// A game submission in either of the two accepted encodings.
#[derive(Debug)]
pub enum GamePayload {
    /// `application/json` body.
    Json(SubmitGameRequest),
    /// `application/x-www-form-urlencoded` body.
    Form(GameForm),
}

impl<S> FromRequest<S> for GamePayload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"));

        if is_form {
            let Form(form) = Form::<GameForm>::from_request(req, state)
                .await
                .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
            Ok(GamePayload::Form(form))
        } else {
            let Json(request) = Json::<SubmitGameRequest>::from_request(req, state)
                .await
                .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
            Ok(GamePayload::Json(request))
        }
    }
}

/// Fully materialized game aggregate returned to clients.
#[derive(Debug, Serialize, ToSchema)]
pub struct GameResponse {
    pub id: i64,
    pub game_type: GameVariant,
    /// RFC 3339 timestamp.
    pub game_date: String,
    pub scores: Vec<ScoreResponse>,
}

/// Per-player result projection. Absent components are omitted from the JSON
/// output, never coerced to zero.
#[skip_serializing_none]
#[derive(Debug, Serialize, ToSchema)]
pub struct ScoreResponse {
    pub player_name: String,
    pub score: Option<i64>,
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

/// Identifier payload returned once a game has been created.
#[derive(Debug, Serialize, ToSchema)]
pub struct GameCreatedResponse {
    /// Store-assigned identifier of the new game.
    #[serde(rename = "gameId")]
    pub game_id: i64,
}

impl From<GameEntity> for GameResponse {
    fn from(entity: GameEntity) -> Self {
        Self {
            id: entity.id,
            game_type: entity.variant,
            game_date: format_timestamp(entity.played_on),
            scores: entity.scores.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<ScoreEntity> for ScoreResponse {
    fn from(entity: ScoreEntity) -> Self {
        let mut response = Self {
            player_name: entity.player_name,
            score: None,
            legacy_score: None,
            base_cards: None,
            extra_vp: None,
            basic_events: None,
            special_events: None,
            prosperity_cards: None,
            visitors: None,
            journey: None,
            garland_award: None,
        };
        match entity.sheet {
            ScoreSheet::Total(total) => response.score = Some(total),
            ScoreSheet::Breakdown(b) => {
                response.legacy_score = b.legacy_score;
                response.base_cards = b.base_cards;
                response.extra_vp = b.extra_vp;
                response.basic_events = b.basic_events;
                response.special_events = b.special_events;
                response.prosperity_cards = b.prosperity_cards;
                response.visitors = b.visitors;
                response.journey = b.journey;
                response.garland_award = b.garland_award;
            }
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::models::ScoreBreakdown;
    use time::macros::datetime;

    #[test]
    fn absent_components_are_omitted_from_json() {
        let entity = ScoreEntity {
            player_name: "Alice".into(),
            sheet: ScoreSheet::Breakdown(ScoreBreakdown {
                base_cards: Some(10),
                visitors: Some(0),
                ..ScoreBreakdown::default()
            }),
        };
        let value = serde_json::to_value(ScoreResponse::from(entity)).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object["base_cards"], 10);
        assert_eq!(object["visitors"], 0);
        assert!(!object.contains_key("basic_events"));
        assert!(!object.contains_key("score"));
    }

    #[test]
    fn total_sheet_serializes_single_score() {
        let entity = ScoreEntity {
            player_name: "Bob".into(),
            sheet: ScoreSheet::Total(37),
        };
        let value = serde_json::to_value(ScoreResponse::from(entity)).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object["score"], 37);
        assert!(!object.contains_key("base_cards"));
    }

    #[test]
    fn game_response_formats_rfc3339() {
        let entity = GameEntity {
            id: 5,
            variant: GameVariant::Root,
            played_on: datetime!(2024-01-01 00:00:00 UTC),
            scores: vec![],
        };
        let response = GameResponse::from(entity);
        assert_eq!(response.game_date, "2024-01-01T00:00:00Z");

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["game_type"], "root");
    }

    #[test]
    fn submit_request_accepts_partial_component_sets() {
        let request: SubmitGameRequest = serde_json::from_str(
            r#"{"game_date":"2024-01-01","scores":[{"player_name":"Alice","base_cards":10}]}"#,
        )
        .unwrap();
        assert_eq!(request.scores.len(), 1);
        assert_eq!(request.scores[0].base_cards, Some(10));
        assert_eq!(request.scores[0].basic_events, None);
        assert!(request.scores[0].has_component_fields());
    }
}
