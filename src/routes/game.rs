use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;

use crate::{
    dao::models::GameVariant,
    dto::{
        common::MessageResponse,
        game::{GameCreatedResponse, GamePayload, GameResponse, SubmitGameRequest},
    },
    error::AppError,
    services::game_service,
    state::SharedState,
};

/// Query parameter selecting the game to update or delete.
#[derive(Debug, Deserialize)]
pub struct GameIdQuery {
    /// Store-assigned game identifier.
    pub id: i64,
}

/// Routes handling game recording and retrieval.
///
/// Each supported variant gets its own route tree under `/{variant}`, the way
/// the deployment exposes one tracker per game; the bare `/games` reads span
/// all variants.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/games", get(list_games))
        .route("/games/{id}", get(get_game))
        .route(
            "/{variant}/games",
            get(list_variant_games)
                .post(create_game)
                .put(update_game)
                .delete(delete_game),
        )
}

/// List every recorded game across all variants, newest first.
#[utoipa::path(
    get,
    path = "/games",
    tag = "games",
    responses(
        (status = 200, description = "All recorded games", body = [GameResponse])
    )
)]
pub async fn list_games(
    State(state): State<SharedState>,
) -> Result<Json<Vec<GameResponse>>, AppError> {
    Ok(Json(game_service::list_games(&state, None).await?))
}

/// Fetch a single game aggregate by id.
#[utoipa::path(
    get,
    path = "/games/{id}",
    tag = "games",
    params(("id" = i64, Path, description = "Store-assigned game identifier")),
    responses(
        (status = 200, description = "The requested game", body = GameResponse),
        (status = 404, description = "Unknown game id")
    )
)]
pub async fn get_game(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<Json<GameResponse>, AppError> {
    Ok(Json(game_service::get_game(&state, id).await?))
}

/// List recorded games of one variant, newest first.
#[utoipa::path(
    get,
    path = "/{variant}/games",
    tag = "games",
    params(("variant" = GameVariant, Path, description = "Game variant")),
    responses(
        (status = 200, description = "Recorded games of the variant", body = [GameResponse])
    )
)]
pub async fn list_variant_games(
    State(state): State<SharedState>,
    Path(variant): Path<GameVariant>,
) -> Result<Json<Vec<GameResponse>>, AppError> {
    Ok(Json(game_service::list_games(&state, Some(variant)).await?))
}

/// Record a new game session.
#[utoipa::path(
    post,
    path = "/{variant}/games",
    tag = "games",
    params(("variant" = GameVariant, Path, description = "Game variant")),
    request_body = SubmitGameRequest,
    responses(
        (status = 201, description = "Game recorded", body = GameCreatedResponse),
        (status = 400, description = "Malformed submission")
    )
)]
pub async fn create_game(
    State(state): State<SharedState>,
    Path(variant): Path<GameVariant>,
    payload: GamePayload,
) -> Result<(StatusCode, Json<GameCreatedResponse>), AppError> {
    let created = game_service::create_game(&state, variant, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Replace a game's date and entire score set.
#[utoipa::path(
    put,
    path = "/{variant}/games",
    tag = "games",
    params(
        ("variant" = GameVariant, Path, description = "Game variant"),
        ("id" = i64, Query, description = "Game to replace")
    ),
    request_body = SubmitGameRequest,
    responses(
        (status = 200, description = "Game replaced", body = MessageResponse),
        (status = 404, description = "Unknown id or variant mismatch")
    )
)]
pub async fn update_game(
    State(state): State<SharedState>,
    Path(variant): Path<GameVariant>,
    Query(query): Query<GameIdQuery>,
    payload: GamePayload,
) -> Result<Json<MessageResponse>, AppError> {
    game_service::update_game(&state, variant, query.id, payload).await?;
    Ok(Json(MessageResponse::new("game updated")))
}

/// Delete a game together with its score rows.
#[utoipa::path(
    delete,
    path = "/{variant}/games",
    tag = "games",
    params(
        ("variant" = GameVariant, Path, description = "Game variant"),
        ("id" = i64, Query, description = "Game to delete")
    ),
    responses(
        (status = 200, description = "Game deleted", body = MessageResponse),
        (status = 404, description = "Unknown id or variant mismatch")
    )
)]
pub async fn delete_game(
    State(state): State<SharedState>,
    Path(variant): Path<GameVariant>,
    Query(query): Query<GameIdQuery>,
) -> Result<Json<MessageResponse>, AppError> {
    game_service::delete_game(&state, variant, query.id).await?;
    Ok(Json(MessageResponse::new("game deleted")))
}
