use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Tally Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::game::list_games,
        crate::routes::game::get_game,
        crate::routes::game::list_variant_games,
        crate::routes::game::create_game,
        crate::routes::game::update_game,
        crate::routes::game::delete_game,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::common::MessageResponse,
            crate::dto::game::SubmitGameRequest,
            crate::dto::game::ScoreEntryInput,
            crate::dto::game::GameResponse,
            crate::dto::game::ScoreResponse,
            crate::dto::game::GameCreatedResponse,
            crate::dao::models::GameVariant,
        )
    ),
    tags(
        (name = "games", description = "Game session recording and retrieval"),
        (name = "health", description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;
